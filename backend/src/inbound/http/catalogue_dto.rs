//! Request and response bodies for contacts and products.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Contact, ContactDraft, Error, Product, ProductDraft, parse_date};
use crate::inbound::http::validation::missing_field;

/// Contact as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactBody {
    /// Contact id.
    pub id: i64,
    /// Unique email address.
    #[schema(example = "factory@example.com")]
    pub email: String,
    /// Country.
    pub country: String,
    /// City.
    pub city: String,
    /// Street.
    pub street: String,
    /// House number.
    pub house_number: String,
}

impl From<Contact> for ContactBody {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id.value(),
            email: contact.email,
            country: contact.country,
            city: contact.city,
            street: contact.street,
            house_number: contact.house_number,
        }
    }
}

/// Body of `POST /api/v1/contacts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ContactRequest {
    /// Unique email address.
    pub email: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Street.
    pub street: Option<String>,
    /// House number.
    pub house_number: Option<String>,
}

impl TryFrom<ContactRequest> for ContactDraft {
    type Error = Error;

    fn try_from(value: ContactRequest) -> Result<Self, Self::Error> {
        let email = value.email.ok_or_else(|| missing_field("email"))?;
        let country = value.country.ok_or_else(|| missing_field("country"))?;
        let city = value.city.ok_or_else(|| missing_field("city"))?;
        let street = value.street.ok_or_else(|| missing_field("street"))?;
        let house_number = value
            .house_number
            .ok_or_else(|| missing_field("house_number"))?;
        Ok(Self::try_new(&email, &country, &city, &street, &house_number)?)
    }
}

/// Product as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductBody {
    /// Product id.
    pub id: i64,
    /// Product name.
    #[schema(example = "iPhone 15 Pro")]
    pub name: String,
    /// Model designation.
    #[schema(example = "A2848")]
    pub model: String,
    /// Market release date.
    #[schema(value_type = String, format = Date, example = "2023-09-22")]
    pub release_date: NaiveDate,
}

impl From<Product> for ProductBody {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.value(),
            name: product.name,
            model: product.model,
            release_date: product.release_date,
        }
    }
}

/// Body of `POST /api/v1/products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProductRequest {
    /// Product name.
    pub name: Option<String>,
    /// Model designation.
    pub model: Option<String>,
    /// Release date as `YYYY-MM-DD`.
    pub release_date: Option<String>,
}

impl TryFrom<ProductRequest> for ProductDraft {
    type Error = Error;

    fn try_from(value: ProductRequest) -> Result<Self, Self::Error> {
        let name = value.name.ok_or_else(|| missing_field("name"))?;
        let model = value.model.ok_or_else(|| missing_field("model"))?;
        let raw_date = value
            .release_date
            .ok_or_else(|| missing_field("release_date"))?;
        let release_date = parse_date("release_date", &raw_date)?;
        Ok(Self::try_new(&name, &model, release_date)?)
    }
}
