#[cfg(test)]
mod integration_tests {
    use crate::schemas::{ApiResponse, ErrorResponse, HealthResponse};
    use crate::test_utils::test_utils::{
        admin_token, init_test_tracing, setup_test_app, setup_test_server, user_token,
        TEST_PASSWORD,
    };
    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::{TestRequest, TestServer};
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use std::str::FromStr;

    trait Bearer {
        fn bearer(self, token: &str) -> Self;
    }

    impl Bearer for TestRequest {
        fn bearer(self, token: &str) -> Self {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).unwrap();
            self.add_header(header::AUTHORIZATION, value)
        }
    }

    async fn create(server: &TestServer, path: &str, body: Value) -> Value {
        let response = server.post(path).json(&body).await;
        if response.status_code() != StatusCode::CREATED {
            panic!(
                "Expected 201 Created from {}, got {}: {}",
                path,
                response.status_code(),
                response.text()
            );
        }
        let body: ApiResponse<Value> = response.json();
        assert!(body.success);
        body.data
    }

    fn id_of(value: &Value) -> i64 {
        value["id"].as_i64().expect("id")
    }

    fn decimal(value: &Value) -> Decimal {
        match value {
            Value::String(s) => Decimal::from_str(s).expect("decimal string"),
            other => Decimal::from_str(&other.to_string()).expect("decimal number"),
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.database, "connected");
    }

    #[tokio::test]
    async fn test_category_crud() {
        let _guard = init_test_tracing();
        let (server, _) = setup_test_server().await;

        let created = create(
            &server,
            "/api/v1/categories",
            json!({ "name": "Beverages", "description": "Soft drinks, coffees, teas" }),
        )
        .await;
        let id = id_of(&created);
        assert_eq!(created["name"], "Beverages");

        let response = server.get(&format!("/api/v1/categories/{id}")).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.message, "Category retrieved successfully");
        assert_eq!(body.data["description"], "Soft drinks, coffees, teas");

        // PUT overwrites every field, including clearing the description.
        let response = server
            .put(&format!("/api/v1/categories/{id}"))
            .json(&json!({ "name": "Drinks" }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["name"], "Drinks");
        assert!(body.data["description"].is_null());

        let response = server.get("/api/v1/categories").await;
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 1);

        server
            .delete(&format!("/api/v1/categories/{id}"))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/categories/{id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_not_found_uses_error_envelope() {
        let (server, _) = setup_test_server().await;

        let response = server.get("/api/v1/shippers/999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.code, "NOT_FOUND");
        assert!(body.error.contains("999"));
    }

    #[tokio::test]
    async fn test_update_missing_entity_is_not_found() {
        let (server, _) = setup_test_server().await;

        server
            .put("/api/v1/regions/42")
            .json(&json!({ "description": "Nowhere" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_validation() {
        let (server, _) = setup_test_server().await;

        server
            .post("/api/v1/categories")
            .json(&json!({ "name": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/v1/products")
            .json(&json!({ "name": "Chai", "unit_price": "-1.00" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_include_related_rows() {
        let (server, _) = setup_test_server().await;

        let category = create(&server, "/api/v1/categories", json!({ "name": "Condiments" })).await;
        let category_id = id_of(&category);
        for name in ["Aniseed Syrup", "Chef Anton's Cajun Seasoning"] {
            create(
                &server,
                "/api/v1/products",
                json!({ "name": name, "category_id": category_id, "unit_price": "10.00" }),
            )
            .await;
        }

        let response = server
            .get(&format!("/api/v1/categories/{category_id}"))
            .add_query_param("include", "products")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        let products = body.data["products"].as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["name"], "Aniseed Syrup");

        // Without include nothing is embedded.
        let body: ApiResponse<Value> = server
            .get(&format!("/api/v1/categories/{category_id}"))
            .await
            .json();
        assert!(body.data.get("products").is_none());

        let nested: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/categories/{category_id}/products"))
            .await
            .json();
        assert_eq!(nested.data.len(), 2);

        server
            .get("/api/v1/categories")
            .add_query_param("include", "suppliers")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_product_filters() {
        let (server, _) = setup_test_server().await;

        let beverages = id_of(&create(&server, "/api/v1/categories", json!({ "name": "Beverages" })).await);
        let seafood = id_of(&create(&server, "/api/v1/categories", json!({ "name": "Seafood" })).await);
        create(&server, "/api/v1/products", json!({ "name": "Chai", "category_id": beverages })).await;
        create(
            &server,
            "/api/v1/products",
            json!({ "name": "Chang", "category_id": beverages, "discontinued": true }),
        )
        .await;
        create(&server, "/api/v1/products", json!({ "name": "Ikura", "category_id": seafood })).await;

        let body: ApiResponse<Vec<Value>> = server
            .get("/api/v1/products")
            .add_query_param("category_id", beverages)
            .await
            .json();
        assert_eq!(body.data.len(), 2);

        let body: ApiResponse<Vec<Value>> = server
            .get("/api/v1/products")
            .add_query_param("category_id", beverages)
            .add_query_param("discontinued", false)
            .await
            .json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["name"], "Chai");

        let body: ApiResponse<Vec<Value>> = server.get("/api/v1/products/discontinued").await.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["name"], "Chang");
    }

    #[tokio::test]
    async fn test_deleting_category_cascades_to_products() {
        let (server, _) = setup_test_server().await;

        let category = id_of(&create(&server, "/api/v1/categories", json!({ "name": "Produce" })).await);
        let product = id_of(
            &create(&server, "/api/v1/products", json!({ "name": "Tofu", "category_id": category })).await,
        );

        server
            .delete(&format!("/api/v1/categories/{category}"))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/products/{product}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_archive_hides_row() {
        let (server, _) = setup_test_server().await;

        let region = id_of(&create(&server, "/api/v1/regions", json!({ "description": "Eastern" })).await);
        create(&server, "/api/v1/regions", json!({ "description": "Western" })).await;

        server
            .delete(&format!("/api/v1/regions/{region}/archive"))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .get(&format!("/api/v1/regions/{region}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        let body: ApiResponse<Vec<Value>> = server.get("/api/v1/regions").await.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["description"], "Western");
    }

    #[tokio::test]
    async fn test_create_order_with_details() {
        let (server, _) = setup_test_server().await;

        let customer = id_of(
            &create(
                &server,
                "/api/v1/customers",
                json!({ "code": "ALFKI", "company_name": "Alfreds Futterkiste" }),
            )
            .await,
        );
        let chai = id_of(&create(&server, "/api/v1/products", json!({ "name": "Chai" })).await);
        let chang = id_of(&create(&server, "/api/v1/products", json!({ "name": "Chang" })).await);

        let order = create(
            &server,
            "/api/v1/orders",
            json!({
                "customer_id": customer,
                "order_date": "1996-07-04",
                "freight": "32.38",
                "ship_name": "Alfreds Futterkiste",
                "details": [
                    { "product_id": chai, "unit_price": "18.00", "quantity": 2 },
                    { "product_id": chang, "unit_price": "19.00", "quantity": 10, "discount": "0.5" }
                ]
            }),
        )
        .await;
        let order_id = id_of(&order);
        assert_eq!(order["customer_id"], customer);
        let details = order["details"].as_array().unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(decimal(&details[0]["line_total"]), Decimal::new(36, 0));
        assert_eq!(decimal(&details[1]["line_total"]), Decimal::new(95, 0));

        let body: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/orders/{order_id}/details"))
            .await
            .json();
        assert_eq!(body.data.len(), 2);

        let body: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/customers/{customer}/orders"))
            .await
            .json();
        assert_eq!(body.data.len(), 1);

        let body: ApiResponse<Value> = server
            .get(&format!("/api/v1/orders/{order_id}"))
            .add_query_param("include", "customer,order_details")
            .await
            .json();
        assert_eq!(body.data["customer"]["code"], "ALFKI");
        assert_eq!(body.data["order_details"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_order_rolls_back_on_bad_line() {
        let (server, _) = setup_test_server().await;

        let chai = id_of(&create(&server, "/api/v1/products", json!({ "name": "Chai" })).await);

        let response = server
            .post("/api/v1/orders")
            .json(&json!({
                "ship_name": "Duplicate lines",
                "details": [
                    { "product_id": chai, "unit_price": "18.00", "quantity": 1 },
                    { "product_id": chai, "unit_price": "18.00", "quantity": 1 }
                ]
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let body: ApiResponse<Vec<Value>> = server.get("/api/v1/orders").await.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_order_amounts_out_of_range_are_rejected() {
        let (server, _) = setup_test_server().await;

        let chai = id_of(&create(&server, "/api/v1/products", json!({ "name": "Chai" })).await);

        server
            .post("/api/v1/orders")
            .json(&json!({
                "details": [
                    { "product_id": chai, "unit_price": "7000000000000000000000000", "quantity": 32767 }
                ]
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/v1/orders")
            .json(&json!({ "freight": "-5.00" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let body: ApiResponse<Vec<Value>> = server.get("/api/v1/orders").await.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_order_line_maintenance() {
        let (server, _) = setup_test_server().await;

        let chai = id_of(&create(&server, "/api/v1/products", json!({ "name": "Chai" })).await);
        let order = id_of(&create(&server, "/api/v1/orders", json!({ "ship_name": "Walk-in" })).await);

        let line = create(
            &server,
            &format!("/api/v1/orders/{order}/details"),
            json!({ "product_id": chai, "unit_price": "18.00", "quantity": 3 }),
        )
        .await;
        assert_eq!(line["order_id"], order);

        server
            .post(&format!("/api/v1/orders/{order}/details"))
            .json(&json!({ "product_id": chai, "unit_price": "18.00", "quantity": 0 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .delete(&format!("/api/v1/orders/{order}/details/{chai}"))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .delete(&format!("/api/v1/orders/{order}/details/{chai}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_employee_hierarchy() {
        let (server, _) = setup_test_server().await;

        let fuller = id_of(
            &create(
                &server,
                "/api/v1/employees",
                json!({ "last_name": "Fuller", "first_name": "Andrew", "title": "Vice President, Sales" }),
            )
            .await,
        );
        let buchanan = id_of(
            &create(
                &server,
                "/api/v1/employees",
                json!({ "last_name": "Buchanan", "first_name": "Steven", "reports_to": fuller }),
            )
            .await,
        );
        let dodsworth = id_of(
            &create(
                &server,
                "/api/v1/employees",
                json!({ "last_name": "Dodsworth", "first_name": "Anne", "reports_to": buchanan }),
            )
            .await,
        );

        let body: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/employees/{fuller}/direct-reports"))
            .await
            .json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(id_of(&body.data[0]), buchanan);

        let body: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/employees/{dodsworth}/management-chain"))
            .await
            .json();
        let chain: Vec<i64> = body.data.iter().map(id_of).collect();
        assert_eq!(chain, vec![buchanan, fuller]);

        let body: ApiResponse<Value> = server
            .get(&format!("/api/v1/employees/{fuller}/manager"))
            .await
            .json();
        assert!(body.data.is_null());

        // Fuller reporting to his own subordinate would close a cycle.
        server
            .put(&format!("/api/v1/employees/{fuller}"))
            .json(&json!({ "last_name": "Fuller", "first_name": "Andrew", "reports_to": dodsworth }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/api/v1/employees")
            .json(&json!({ "last_name": "Nobody", "first_name": "Ann", "reports_to": 999 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_employee_territories() {
        let (server, _) = setup_test_server().await;

        let region = id_of(&create(&server, "/api/v1/regions", json!({ "description": "Eastern" })).await);
        let territory = id_of(
            &create(
                &server,
                "/api/v1/territories",
                json!({ "description": "Westboro", "region_id": region }),
            )
            .await,
        );
        let employee = id_of(
            &create(
                &server,
                "/api/v1/employees",
                json!({ "last_name": "Davolio", "first_name": "Nancy" }),
            )
            .await,
        );

        server
            .put(&format!("/api/v1/employees/{employee}/territories/{territory}"))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .put(&format!("/api/v1/employees/{employee}/territories/{territory}"))
            .await
            .assert_status(StatusCode::CONFLICT);

        let body: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/territories/{territory}/employees"))
            .await
            .json();
        assert_eq!(body.data.len(), 1);

        let body: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/regions/{region}/territories"))
            .await
            .json();
        assert_eq!(body.data.len(), 1);

        server
            .delete(&format!("/api/v1/employees/{employee}/territories/{territory}"))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        let body: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/employees/{employee}/territories"))
            .await
            .json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_customer_demographics() {
        let (server, _) = setup_test_server().await;

        let customer = id_of(
            &create(
                &server,
                "/api/v1/customers",
                json!({ "code": "BERGS", "company_name": "Berglunds snabbköp" }),
            )
            .await,
        );
        let demographic = id_of(
            &create(
                &server,
                "/api/v1/customer-demographics",
                json!({ "description": "Wholesale" }),
            )
            .await,
        );

        server
            .put(&format!("/api/v1/customers/{customer}/demographics/{demographic}"))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let body: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/customer-demographics/{demographic}/customers"))
            .await
            .json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["code"], "BERGS");

        let body: ApiResponse<Value> = server.get("/api/v1/customers/by-code/BERGS").await.json();
        assert_eq!(id_of(&body.data), customer);

        server
            .delete(&format!("/api/v1/customers/{customer}/demographics/{demographic}"))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        let body: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/customers/{customer}/demographics"))
            .await
            .json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_register_login_and_me() {
        let (server, _) = setup_test_server().await;

        let user = create(
            &server,
            "/api/v1/account/register",
            json!({ "user_name": "nancy", "email": "nancy@northwind.com", "password": TEST_PASSWORD }),
        )
        .await;
        assert!(user.get("password_hash").is_none());

        server
            .post("/api/v1/account/login")
            .json(&json!({ "login": "nancy", "password": "wrong" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let response = server
            .post("/api/v1/account/login")
            .json(&json!({ "login": "NANCY@northwind.com", "password": TEST_PASSWORD }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["token_type"], "Bearer");
        assert_eq!(body.data["expires_in"], 3600);
        let token = body.data["access_token"].as_str().unwrap().to_string();

        let response = server
            .get("/api/v1/account/me")
            .bearer(&token)
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["user"]["user_name"], "nancy");
        assert!(body.data["roles"].as_array().unwrap().is_empty());

        server.get("/api/v1/account/me").await.assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/api/v1/account/me")
            .bearer("not-a-token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password_and_duplicates() {
        let (server, _) = setup_test_server().await;

        server
            .post("/api/v1/account/register")
            .json(&json!({ "user_name": "nancy", "email": "nancy@northwind.com", "password": "password" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let body = json!({ "user_name": "nancy", "email": "nancy@northwind.com", "password": TEST_PASSWORD });
        server.post("/api/v1/account/register").json(&body).await.assert_status(StatusCode::CREATED);
        server.post("/api/v1/account/register").json(&body).await.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_change_password() {
        let (server, state) = setup_test_server().await;
        let token = user_token(&state, "janet").await;

        server
            .post("/api/v1/account/change-password")
            .bearer(&token)
            .json(&json!({ "current_password": "wrong", "new_password": "N3w!pass" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        server
            .post("/api/v1/account/change-password")
            .bearer(&token)
            .json(&json!({ "current_password": TEST_PASSWORD, "new_password": "N3w!pass" }))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        server
            .post("/api/v1/account/login")
            .json(&json!({ "login": "janet", "password": "N3w!pass" }))
            .await
            .assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin_role() {
        let (server, state) = setup_test_server().await;

        server.get("/api/v1/admin/roles").await.assert_status(StatusCode::UNAUTHORIZED);

        let token = user_token(&state, "margaret").await;
        let response = server
            .get("/api/v1/admin/roles")
            .bearer(&token)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_admin_access_follows_stored_roles() {
        let (server, state) = setup_test_server().await;
        let admin = admin_token(&state).await;

        user_token(&state, "janet").await;
        let janet = state.users.find_by_name("janet").await.unwrap().unwrap();
        state.users.add_to_role(janet.id, "Admin").await.unwrap();
        let roles = state.users.role_names_of(janet.id).await.unwrap();
        let token = state.tokens.issue(&janet, roles, vec![]).unwrap();

        server
            .get("/api/v1/admin/roles")
            .bearer(&token)
            .await
            .assert_status(StatusCode::OK);

        state.users.remove_from_role(janet.id, "Admin").await.unwrap();
        server
            .get("/api/v1/admin/roles")
            .bearer(&token)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        state.users.add_to_role(janet.id, "Admin").await.unwrap();
        server
            .delete(&format!("/api/v1/admin/users/{}", janet.id))
            .bearer(&admin)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get("/api/v1/admin/roles")
            .bearer(&token)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_role_administration() {
        let (server, state) = setup_test_server().await;
        let token = admin_token(&state).await;

        let response = server
            .post("/api/v1/admin/roles")
            .bearer(&token)
            .json(&json!({ "name": "Sales" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        let sales = id_of(&body.data);

        server
            .post("/api/v1/admin/roles")
            .bearer(&token)
            .json(&json!({ "name": "sales" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        let response = server
            .put(&format!("/api/v1/admin/roles/{sales}"))
            .bearer(&token)
            .json(&json!({ "name": "Sales Representatives" }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["name"], "Sales Representatives");

        let body: ApiResponse<Vec<Value>> = server
            .get("/api/v1/admin/roles")
            .bearer(&token)
            .await
            .json();
        assert_eq!(body.data.len(), 2);

        server
            .delete(&format!("/api/v1/admin/roles/{sales}"))
            .bearer(&token)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/admin/roles/{sales}"))
            .bearer(&token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_role_mutation_requires_claim() {
        let (server, state) = setup_test_server().await;
        let admin = admin_token(&state).await;

        // An admin without the role-management claims.
        user_token(&state, "steven").await;
        let steven = state.users.find_by_name("steven").await.unwrap().unwrap();
        state.users.add_to_role(steven.id, "Admin").await.unwrap();
        let roles = state.users.role_names_of(steven.id).await.unwrap();
        let token = state.tokens.issue(&steven, roles, vec![]).unwrap();

        server
            .post("/api/v1/admin/roles")
            .bearer(&token)
            .json(&json!({ "name": "Sales" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        // Grant only 'Create Role' through the claims endpoint.
        let response = server
            .put(&format!("/api/v1/admin/users/{}/claims", steven.id))
            .bearer(&admin)
            .json(&json!([{ "claim_type": "Create Role", "is_selected": true }]))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 3);
        let selected: Vec<&Value> = body.data.iter().filter(|f| f["is_selected"] == true).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0]["claim_type"], "Create Role");

        let claims = state.users.granted_claims_of(steven.id).await.unwrap();
        let roles = state.users.role_names_of(steven.id).await.unwrap();
        let token = state.tokens.issue(&steven, roles, claims).unwrap();
        let response = server
            .post("/api/v1/admin/roles")
            .bearer(&token)
            .json(&json!({ "name": "Sales" }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let sales = id_of(&response.json::<ApiResponse<Value>>().data);

        server
            .delete(&format!("/api/v1/admin/roles/{sales}"))
            .bearer(&token)
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_user_role_flags() {
        let (server, state) = setup_test_server().await;
        let admin = admin_token(&state).await;
        user_token(&state, "robert").await;
        let robert = state.users.find_by_name("robert").await.unwrap().unwrap();
        let sales = state.repositories.authorization.add_role("Sales").await.unwrap();

        let body: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/admin/users/{}/roles", robert.id))
            .bearer(&admin)
            .await
            .json();
        assert_eq!(body.data.len(), 2);
        assert!(body.data.iter().all(|flag| flag["is_selected"] == false));

        let response = server
            .put(&format!("/api/v1/admin/users/{}/roles", robert.id))
            .bearer(&admin)
            .json(&json!([{ "role_id": sales.id, "role_name": "Sales", "is_selected": true }]))
            .await;
        response.assert_status(StatusCode::OK);

        let body: ApiResponse<Vec<Value>> = server
            .get(&format!("/api/v1/admin/roles/{}/users", sales.id))
            .bearer(&admin)
            .await
            .json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["user_name"], "robert");

        server
            .put(&format!("/api/v1/admin/users/{}/roles", robert.id))
            .bearer(&admin)
            .json(&json!([{ "role_id": 999, "role_name": "Ghost", "is_selected": true }]))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .put(&format!("/api/v1/admin/users/{}/claims", robert.id))
            .bearer(&admin)
            .json(&json!([{ "claim_type": "Fly", "is_selected": true }]))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_user_administration() {
        let (server, state) = setup_test_server().await;
        let admin = admin_token(&state).await;
        user_token(&state, "laura").await;
        let laura = state.users.find_by_name("laura").await.unwrap().unwrap();

        let body: ApiResponse<Vec<Value>> = server
            .get("/api/v1/admin/users")
            .bearer(&admin)
            .await
            .json();
        assert_eq!(body.data.len(), 2);

        let response = server
            .put(&format!("/api/v1/admin/users/{}", laura.id))
            .bearer(&admin)
            .json(&json!({ "email": "laura.callahan@northwind.com", "first_name": "Laura" }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["email"], "laura.callahan@northwind.com");

        server
            .delete(&format!("/api/v1/admin/users/{}", laura.id))
            .bearer(&admin)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        server
            .get(&format!("/api/v1/admin/users/{}", laura.id))
            .bearer(&admin)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
