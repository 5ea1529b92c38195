use model::entities::customer;
use sea_orm::ActiveValue::{Set, Unchanged};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct CustomerRequest {
    /// Unique five letter code
    #[validate(length(min = 1, max = 5))]
    #[schema(example = "ALFKI")]
    pub code: String,
    #[validate(length(min = 1, max = 40))]
    #[schema(example = "Alfreds Futterkiste")]
    pub company_name: String,
    #[validate(length(max = 30))]
    pub contact_name: Option<String>,
    #[validate(length(max = 30))]
    pub contact_title: Option<String>,
    #[validate(length(max = 60))]
    pub address: Option<String>,
    #[validate(length(max = 15))]
    pub city: Option<String>,
    #[validate(length(max = 15))]
    pub region: Option<String>,
    #[validate(length(max = 10))]
    pub postal_code: Option<String>,
    #[validate(length(max = 15))]
    pub country: Option<String>,
    #[validate(length(max = 24))]
    pub phone: Option<String>,
    #[validate(length(max = 24))]
    pub fax: Option<String>,
}

impl CustomerRequest {
    pub fn into_new_model(self) -> customer::ActiveModel {
        customer::ActiveModel {
            code: Set(self.code),
            company_name: Set(self.company_name),
            contact_name: Set(self.contact_name),
            contact_title: Set(self.contact_title),
            address: Set(self.address),
            city: Set(self.city),
            region: Set(self.region),
            postal_code: Set(self.postal_code),
            country: Set(self.country),
            phone: Set(self.phone),
            fax: Set(self.fax),
            ..Default::default()
        }
    }

    pub fn into_model(self, id: i32) -> customer::ActiveModel {
        customer::ActiveModel {
            id: Unchanged(id),
            ..self.into_new_model()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub code: String,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub contact_title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
}

impl From<customer::Model> for CustomerResponse {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            company_name: model.company_name,
            contact_name: model.contact_name,
            contact_title: model.contact_title,
            address: model.address,
            city: model.city,
            region: model.region,
            postal_code: model.postal_code,
            country: model.country,
            phone: model.phone,
            fax: model.fax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn request() -> CustomerRequest {
        CustomerRequest {
            code: "ALFKI".to_string(),
            company_name: "Alfreds Futterkiste".to_string(),
            contact_name: Some("Maria Anders".to_string()),
            contact_title: None,
            address: None,
            city: Some("Berlin".to_string()),
            region: None,
            postal_code: None,
            country: Some("Germany".to_string()),
            phone: None,
            fax: None,
        }
    }

    #[test]
    fn test_validation() {
        assert!(request().validate().is_ok());

        let too_long = CustomerRequest {
            code: "ALFKIX".to_string(),
            ..request()
        };
        let errors = too_long.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("code"));
    }

    #[test]
    fn test_update_mapping_sets_every_field() {
        let model = request().into_model(3);
        assert_eq!(model.id, ActiveValue::Unchanged(3));
        // Omitted optional fields are written as NULL, not left untouched.
        assert_eq!(model.fax, ActiveValue::Set(None));
        assert_eq!(model.city, ActiveValue::Set(Some("Berlin".to_string())));
    }
}
