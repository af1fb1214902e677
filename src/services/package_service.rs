// src/services/package_service.rs

use uuid::Uuid;

use crate::models::crm::{Client, PurchasedPackage};

/// Primeiro pacote (na ordem do cliente) com crédito > 0 para o serviço.
pub fn find_eligible_package(client: &Client, service_id: Uuid) -> Option<&PurchasedPackage> {
    client
        .purchased_packages
        .iter()
        .find(|p| p.credit_for(service_id).is_some())
}

/// Consome uma unidade de crédito do pacote informado.
///
/// Devolve o cliente atualizado (com `version` incrementada), ou `None` quando o
/// crédito já não existe (ex.: outro agendamento consumiu antes). Nesse caso o
/// chamador NÃO deve marcar o agendamento como pago.
pub fn redeem(client: &Client, package: &PurchasedPackage, service_id: Uuid) -> Option<Client> {
    let mut updated = client.clone();

    let target = updated
        .purchased_packages
        .iter_mut()
        .find(|p| p.package_id == package.package_id && p.credit_for(service_id).is_some())?;

    let index = target
        .remaining_services
        .iter()
        .position(|c| c.service_id == service_id && c.quantity > 0)?;

    target.remaining_services[index].quantity -= 1;

    // Crédito zerado não aparece como linha vazia
    if target.remaining_services[index].quantity <= 0 {
        target.remaining_services.remove(index);
    }

    updated.version += 1;
    Some(updated)
}

/// Saldo total restante de um serviço em todos os pacotes do cliente.
pub fn remaining_credits(client: &Client, service_id: Uuid) -> i32 {
    client
        .purchased_packages
        .iter()
        .flat_map(|p| p.remaining_services.iter())
        .filter(|c| c.service_id == service_id)
        .map(|c| c.quantity)
        .sum()
}
