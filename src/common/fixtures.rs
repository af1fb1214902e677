// src/common/fixtures.rs
//
// Construtores de dados para os testes unitários.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    catalog::{ProfessionalUse, Product, Service, Staff},
    crm::{Client, PackageCredit, PurchasedPackage},
};

pub const TENANT: Uuid = Uuid::from_u128(0x0192_5a3e_0000_7000_8000_0000_0000_0001);

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("data de teste inválida")
        .with_timezone(&Utc)
}

pub fn staff(name: &str, specializations: &[&str]) -> Staff {
    Staff {
        id: Uuid::new_v4(),
        tenant_id: TENANT,
        name: name.to_string(),
        specializations: specializations.iter().map(|s| s.to_string()).collect(),
        is_active: true,
        rating: None,
    }
}

pub fn service(name: &str, duration: i32, price: i64) -> Service {
    service_using(name, duration, price, &[])
}

pub fn service_using(name: &str, duration: i32, price: i64, products: &[(Uuid, i32)]) -> Service {
    Service {
        id: Uuid::new_v4(),
        tenant_id: TENANT,
        name: name.to_string(),
        duration,
        price: Decimal::from(price),
        cost: Decimal::ZERO,
        professional_use_products: products
            .iter()
            .map(|(product_id, quantity_used)| ProfessionalUse {
                product_id: *product_id,
                quantity_used: *quantity_used,
            })
            .collect(),
    }
}

pub fn product(name: &str, stock: i32) -> Product {
    Product {
        id: Uuid::new_v4(),
        tenant_id: TENANT,
        name: name.to_string(),
        stock,
    }
}

pub fn package(name: &str, credits: &[(Uuid, i32)]) -> PurchasedPackage {
    PurchasedPackage {
        package_id: Uuid::new_v4(),
        name: name.to_string(),
        remaining_services: credits
            .iter()
            .map(|(service_id, quantity)| PackageCredit {
                service_id: *service_id,
                quantity: *quantity,
            })
            .collect(),
        purchased_at: None,
    }
}

pub fn client(name: &str, packages: Vec<PurchasedPackage>) -> Client {
    Client {
        id: Uuid::new_v4(),
        tenant_id: TENANT,
        full_name: name.to_string(),
        email: None,
        phone: None,
        loyalty_points: 0,
        purchased_packages: packages,
        acquisition_source: None,
        is_active: true,
        version: 1,
    }
}

/// Todos os créditos do cliente, achatados na ordem dos pacotes.
pub fn credits(client: &Client) -> Vec<PackageCredit> {
    client
        .purchased_packages
        .iter()
        .flat_map(|p| p.remaining_services.iter().cloned())
        .collect()
}
