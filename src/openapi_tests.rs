#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::openapi::{PathItemType, RefOr, schema::Schema};
    use utoipa::OpenApi;

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.expect("components");
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            _ => panic!("{name} should be an object schema"),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        let components = openapi.components.as_ref().unwrap();
        for name in [
            "ErrorResponse",
            "HealthResponse",
            "CategoryResponse",
            "OrderWithLinesResponse",
            "UserRoleFlag",
            "UserClaimFlag",
        ] {
            assert!(components.schemas.contains_key(name), "missing schema {name}");
        }

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");
        for field in ["error", "code", "success"] {
            assert!(properties.iter().any(|p| p == field));
        }
    }

    #[test]
    fn test_health_endpoint_documents_degraded_status() {
        let openapi = ApiDoc::openapi();
        let health = openapi.paths.paths.get("/health").unwrap();
        let get = health.operations.get(&PathItemType::Get).unwrap();

        assert!(get.responses.responses.contains_key("200"));
        assert!(get.responses.responses.contains_key("503"));
    }

    #[test]
    fn test_crud_paths_are_documented() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        for resource in [
            "categories",
            "customers",
            "customer-demographics",
            "employees",
            "orders",
            "products",
            "regions",
            "shippers",
            "suppliers",
            "territories",
        ] {
            let collection = paths
                .get(&format!("/api/v1/{resource}"))
                .unwrap_or_else(|| panic!("missing /api/v1/{resource}"));
            assert!(collection.operations.contains_key(&PathItemType::Get));
            assert!(collection.operations.contains_key(&PathItemType::Post));

            let item = paths
                .get(&format!("/api/v1/{resource}/{{id}}"))
                .unwrap_or_else(|| panic!("missing /api/v1/{resource}/{{id}}"));
            for method in [PathItemType::Get, PathItemType::Put, PathItemType::Delete] {
                assert!(item.operations.contains_key(&method));
            }
        }
    }

    #[test]
    fn test_admin_paths_require_bearer_token() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_value(&openapi).unwrap();

        assert!(json["components"]["securitySchemes"]["bearerAuth"].is_object());

        let security = &json["paths"]["/api/v1/admin/roles"]["post"]["security"];
        assert!(security.to_string().contains("bearerAuth"));

        let public = &json["paths"]["/api/v1/categories"]["get"]["security"];
        assert!(public.is_null());
    }

    #[test]
    fn test_password_hash_is_not_in_user_schema() {
        let properties = object_properties("UserResponse");
        assert!(properties.iter().any(|p| p == "user_name"));
        assert!(!properties.iter().any(|p| p.contains("password")));
    }
}
