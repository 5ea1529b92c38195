use chrono::{DateTime, NaiveDate, Utc};
use model::entities::employee;
use sea_orm::ActiveValue::{Set, Unchanged};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct EmployeeRequest {
    #[validate(length(min = 1, max = 20))]
    #[schema(example = "Davolio")]
    pub last_name: String,
    #[validate(length(min = 1, max = 10))]
    #[schema(example = "Nancy")]
    pub first_name: String,
    #[validate(length(max = 30))]
    pub title: Option<String>,
    #[validate(length(max = 25))]
    pub title_of_courtesy: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
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
    pub home_phone: Option<String>,
    #[validate(length(max = 4))]
    pub extension: Option<String>,
    pub notes: Option<String>,
    /// Manager's employee id
    pub reports_to: Option<i32>,
}

impl EmployeeRequest {
    pub fn into_new_model(self) -> employee::ActiveModel {
        employee::ActiveModel {
            last_name: Set(self.last_name),
            first_name: Set(self.first_name),
            title: Set(self.title),
            title_of_courtesy: Set(self.title_of_courtesy),
            birth_date: Set(self.birth_date),
            hire_date: Set(self.hire_date),
            address: Set(self.address),
            city: Set(self.city),
            region: Set(self.region),
            postal_code: Set(self.postal_code),
            country: Set(self.country),
            home_phone: Set(self.home_phone),
            extension: Set(self.extension),
            notes: Set(self.notes),
            reports_to: Set(self.reports_to),
            ..Default::default()
        }
    }

    pub fn into_model(self, id: i32) -> employee::ActiveModel {
        employee::ActiveModel {
            id: Unchanged(id),
            ..self.into_new_model()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: i32,
    pub last_name: String,
    pub first_name: String,
    pub title: Option<String>,
    pub title_of_courtesy: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub home_phone: Option<String>,
    pub extension: Option<String>,
    pub notes: Option<String>,
    pub reports_to: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<employee::Model> for EmployeeResponse {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            last_name: model.last_name,
            first_name: model.first_name,
            title: model.title,
            title_of_courtesy: model.title_of_courtesy,
            birth_date: model.birth_date,
            hire_date: model.hire_date,
            address: model.address,
            city: model.city,
            region: model.region,
            postal_code: model.postal_code,
            country: model.country,
            home_phone: model.home_phone,
            extension: model.extension,
            notes: model.notes,
            reports_to: model.reports_to,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
