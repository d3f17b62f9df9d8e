//! The `/api/products` endpoints.
//!
//! Every handler loads the whole collection, works on it in memory and, if it
//! changed anything, saves the whole collection back. Nothing is kept between
//! requests.

use std::sync::Arc;

use crate::error::ApiError;
use crate::method::Method;
use crate::middleware::Cors;
use crate::product::{self, Product, ProductPatch};
use crate::request::Request;
use crate::response::Json;
use crate::router::Router;
use crate::status::Status;
use crate::storage::ProductStore;

/// The full service: product routes over `store`, with permissive CORS.
pub fn router<S: ProductStore>(store: S) -> Router<S> {
    Router::new(store)
        .on(Method::Get,    "/api/products",        list::<S>)
        .on(Method::Post,   "/api/products",        create::<S>)
        .on(Method::Get,    "/api/products/search", search::<S>)
        .on(Method::Get,    "/api/products/{id}",   get::<S>)
        .on(Method::Put,    "/api/products/{id}",   update::<S>)
        .on(Method::Delete, "/api/products/{id}",   delete::<S>)
        .layer(Cors::permissive())
}

// GET /api/products
async fn list<S: ProductStore>(store: Arc<S>, _req: Request) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(store.load().await?))
}

// GET /api/products/{id}
async fn get<S: ProductStore>(store: Arc<S>, req: Request) -> Result<Json<Product>, ApiError> {
    let id = path_id(&req);
    store.load().await?
        .into_iter()
        .find(|p| has_id(p, id))
        .map(Json)
        .ok_or(ApiError::NotFound)
}

// POST /api/products → 201
async fn create<S: ProductStore>(store: Arc<S>, req: Request) -> Result<(Status, Json<Product>), ApiError> {
    let patch = body(&req)?;
    let mut products = store.load().await?;

    let id = product::next_id(&products)
        .ok_or_else(|| ApiError::InvalidRequest("no productId left to assign".to_owned()))?;
    let created = Product::create(id, patch);
    products.push(created.clone());
    store.save(&products).await?;

    Ok((Status::Created, Json(created)))
}

// PUT /api/products/{id}
async fn update<S: ProductStore>(store: Arc<S>, req: Request) -> Result<Json<Product>, ApiError> {
    let id = path_id(&req);
    let patch = body(&req)?;
    let mut products = store.load().await?;

    let (Some(id), Some(product)) = (id, products.iter_mut().find(|p| has_id(p, id))) else {
        return Err(ApiError::NotFound);
    };
    product.apply(id, patch);
    let updated = product.clone();
    store.save(&products).await?;

    Ok(Json(updated))
}

// DELETE /api/products/{id} → 204
async fn delete<S: ProductStore>(store: Arc<S>, req: Request) -> Result<Status, ApiError> {
    let id = path_id(&req);
    let mut products = store.load().await?;

    let before = products.len();
    products.retain(|p| !has_id(p, id));
    if products.len() == before {
        return Err(ApiError::NotFound);
    }
    store.save(&products).await?;

    Ok(Status::NoContent)
}

// GET /api/products/search?query=TEXT
async fn search<S: ProductStore>(store: Arc<S>, req: Request) -> Result<Json<Vec<Product>>, ApiError> {
    let query = req.query("query")
        .ok_or_else(|| ApiError::InvalidRequest("missing `query` parameter".to_owned()))?;
    let needle = query.to_lowercase();

    let mut products = store.load().await?;
    products.retain(|p| p.matches(&needle));
    Ok(Json(products))
}

fn path_id(req: &Request) -> Option<u64> {
    req.param("id").and_then(product::parse_id)
}

// A path id that did not parse matches nothing, including records whose own
// id is unreadable.
fn has_id(product: &Product, id: Option<u64>) -> bool {
    id.is_some() && product.id() == id
}

fn body(req: &Request) -> Result<ProductPatch, ApiError> {
    req.json().map_err(|e| ApiError::InvalidRequest(format!("invalid product body: {e}")))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::response::Response;
    use crate::storage::{MemoryStore, StoreError};

    fn seeded(records: Value) -> Router<MemoryStore> {
        router(MemoryStore::new(serde_json::from_value(records).unwrap()))
    }

    fn stored(app: &Router<MemoryStore>) -> Value {
        serde_json::to_value(app.state().snapshot()).unwrap()
    }

    fn json_body(res: &Response) -> Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    async fn call(app: &Router<MemoryStore>, method: Method, target: &str, body: &str) -> Response {
        app.handle(Request::new(method, target, body.to_owned())).await
    }

    #[tokio::test]
    async fn list_returns_everything_in_order() {
        let app = seeded(json!([{"productId": 3, "title": "c"}, {"productId": 1, "title": "a"}]));
        let res = call(&app, Method::Get, "/api/products", "").await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(json_body(&res), json!([{"productId": 3, "title": "c"}, {"productId": 1, "title": "a"}]));
    }

    #[tokio::test]
    async fn get_non_numeric_id_is_not_found() {
        let app = seeded(json!([{"productId": 1}]));
        let res = call(&app, Method::Get, "/api/products/one", "").await;
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.body(), b"Product not found");
    }

    #[tokio::test]
    async fn create_assigns_max_plus_one() {
        let app = seeded(json!([{"productId": 9}, {"productId": 4}]));
        let res = call(&app, Method::Post, "/api/products", r#"{"title":"Lamp","productId":1}"#).await;
        assert_eq!(res.status_code(), 201);
        assert_eq!(json_body(&res), json!({"productId": 10, "title": "Lamp"}));
        assert_eq!(stored(&app)[2], json!({"productId": 10, "title": "Lamp"}));
    }

    #[tokio::test]
    async fn create_in_empty_collection_starts_at_one() {
        let app = seeded(json!([]));
        let res = call(&app, Method::Post, "/api/products", r#"{"title":"First"}"#).await;
        assert_eq!(json_body(&res)["productId"], 1);
    }

    #[tokio::test]
    async fn create_rejects_malformed_body() {
        let app = seeded(json!([]));
        let res = call(&app, Method::Post, "/api/products", "[1,2]").await;
        assert_eq!(res.status_code(), 400);
        assert_eq!(stored(&app), json!([]));
    }

    #[tokio::test]
    async fn update_merges_and_pins_the_id() {
        let app = seeded(json!([{"productId": 1, "title": "Red Shoe", "description": "leather", "size": 42}]));
        let res = call(&app, Method::Put, "/api/products/1", r#"{"productId":5,"title":"Red Boot"}"#).await;
        assert_eq!(res.status_code(), 200);
        let expected = json!({"productId": 1, "title": "Red Boot", "description": "leather", "size": 42});
        assert_eq!(json_body(&res), expected);
        assert_eq!(stored(&app), json!([expected]));
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let app = seeded(json!([{"productId": 1}]));
        let res = call(&app, Method::Put, "/api/products/2", r#"{"title":"x"}"#).await;
        assert_eq!(res.status_code(), 404);
        assert_eq!(stored(&app), json!([{"productId": 1}]));
    }

    #[tokio::test]
    async fn delete_removes_and_answers_no_content() {
        let app = seeded(json!([{"productId": 1}, {"productId": 2}]));
        let res = call(&app, Method::Delete, "/api/products/1", "").await;
        assert_eq!(res.status_code(), 204);
        assert!(res.body().is_empty());
        assert_eq!(stored(&app), json!([{"productId": 2}]));
    }

    #[tokio::test]
    async fn delete_missing_leaves_collection_alone() {
        let app = seeded(json!([{"productId": 1}]));
        let res = call(&app, Method::Delete, "/api/products/7", "").await;
        assert_eq!(res.status_code(), 404);
        assert_eq!(stored(&app), json!([{"productId": 1}]));
    }

    #[tokio::test]
    async fn search_matches_either_field_once() {
        let app = seeded(json!([
            {"productId": 1, "title": "Wool Hat", "description": "warm wool"},
            {"productId": 2, "title": "Shoe", "description": "WOOL lining"},
            {"productId": 3, "title": "Lamp", "description": "brass"}
        ]));
        let res = call(&app, Method::Get, "/api/products/search?query=Wool", "").await;
        assert_eq!(res.status_code(), 200);
        let ids: Vec<u64> = json_body(&res).as_array().unwrap()
            .iter()
            .map(|p| p["productId"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, [1, 2]);
    }

    #[tokio::test]
    async fn search_without_query_is_bad_request() {
        let app = seeded(json!([]));
        let res = call(&app, Method::Get, "/api/products/search", "").await;
        assert_eq!(res.status_code(), 400);
    }

    #[tokio::test]
    async fn responses_carry_cors_origin() {
        let app = seeded(json!([]));
        let res = call(&app, Method::Get, "/api/products/404", "").await;
        assert_eq!(res.header("access-control-allow-origin"), Some("*"));
    }

    struct BrokenStore;

    impl ProductStore for BrokenStore {
        async fn load(&self) -> Result<Vec<Product>, StoreError> {
            Err(StoreError::Read {
                path: "db.json".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }

        async fn save(&self, _products: &[Product]) -> Result<(), StoreError> {
            unreachable!("nothing loads, so nothing saves")
        }
    }

    #[tokio::test]
    async fn storage_failure_is_a_500() {
        let app = router(BrokenStore);
        for (method, target) in [(Method::Get, "/api/products"), (Method::Delete, "/api/products/1")] {
            let res = app.handle(Request::new(method, target, "")).await;
            assert_eq!(res.status_code(), 500);
            assert_eq!(res.body(), b"Error reading database");
        }
    }

    /// Loads fine, refuses every save.
    struct ReadOnlyStore(MemoryStore);

    impl ProductStore for ReadOnlyStore {
        async fn load(&self) -> Result<Vec<Product>, StoreError> {
            self.0.load().await
        }

        async fn save(&self, _products: &[Product]) -> Result<(), StoreError> {
            Err(StoreError::Write {
                path: "db.json".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }
    }

    #[tokio::test]
    async fn failed_save_is_a_500() {
        let records = serde_json::from_value(json!([{"productId": 1, "title": "Lamp"}])).unwrap();
        let app = router(ReadOnlyStore(MemoryStore::new(records)));
        let writes = [
            (Method::Post, "/api/products", r#"{"title":"Mug"}"#),
            (Method::Put, "/api/products/1", r#"{"title":"Desk Lamp"}"#),
            (Method::Delete, "/api/products/1", ""),
        ];
        for (method, target, body) in writes {
            let res = app.handle(Request::new(method, target, body.to_owned())).await;
            assert_eq!(res.status_code(), 500, "{method} {target}");
            assert_eq!(res.body(), b"Error writing to database");
        }
        assert_eq!(app.state().0.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn update_with_null_clears_the_field() {
        let app = seeded(json!([{"productId": 1, "title": "Red Shoe", "description": "leather"}]));
        let res = call(&app, Method::Put, "/api/products/1", r#"{"title":null}"#).await;
        assert_eq!(res.status_code(), 200);
        let expected = json!({"productId": 1, "title": null, "description": "leather"});
        assert_eq!(json_body(&res), expected);
        assert_eq!(stored(&app), json!([expected]));
    }

    #[tokio::test]
    async fn odd_records_do_not_break_their_neighbours() {
        let records = json!([
            {"productId": 1, "title": 5, "description": "crate"},
            {"title": "no id"},
            {"productId": -3, "title": "negative"},
            {"productId": 2, "title": "ok"}
        ]);
        let app = seeded(records.clone());

        let res = call(&app, Method::Get, "/api/products", "").await;
        assert_eq!(json_body(&res), records);

        let res = call(&app, Method::Get, "/api/products/2", "").await;
        assert_eq!(json_body(&res), json!({"productId": 2, "title": "ok"}));

        let res = call(&app, Method::Get, "/api/products/search?query=o", "").await;
        assert_eq!(json_body(&res), json!([records[1], records[3]]));

        let res = call(&app, Method::Post, "/api/products", r#"{"title":"new"}"#).await;
        assert_eq!(json_body(&res)["productId"], 3);
        assert_eq!(stored(&app)[0], records[0]);
    }
}
