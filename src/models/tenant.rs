// src/models/tenant.rs

use uuid::Uuid;

use crate::models::{
    appointment::Appointment,
    catalog::{Product, Service, Staff},
    crm::Client,
    inventory::{StockAdjustment, StockMovement},
};

/// Fotografia imutável dos dados de um tenant, carregada antes de cada operação.
/// O núcleo de agendamento nunca escreve aqui; ele devolve um `TenantUpdates`.
#[derive(Debug, Clone, Default)]
pub struct TenantSnapshot {
    pub tenant_id: Uuid,
    pub clients: Vec<Client>,
    pub staff: Vec<Staff>,
    pub services: Vec<Service>,
    pub inventory: Vec<Product>,
    pub appointments: Vec<Appointment>,
    pub stock_movements: Vec<StockMovement>,
}

impl TenantSnapshot {
    pub fn new(tenant_id: Uuid) -> Self {
        Self { tenant_id, ..Default::default() }
    }

    pub fn client(&self, id: Uuid) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn staff_member(&self, id: Uuid) -> Option<&Staff> {
        self.staff.iter().find(|s| s.id == id)
    }

    pub fn service(&self, id: Uuid) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    #[cfg(test)]
    pub fn product(&self, id: Uuid) -> Option<&Product> {
        self.inventory.iter().find(|p| p.id == id)
    }

    pub fn appointment(&self, id: Uuid) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    /// Resolve os serviços na ordem pedida. Devolve `None` se algum id não existir.
    pub fn resolve_services(&self, ids: &[Uuid]) -> Option<Vec<&Service>> {
        ids.iter().map(|id| self.service(*id)).collect()
    }

    /// Aplica um patch já validado pelo armazenamento.
    /// Versões e saldos vêm prontos no patch; aqui só substituímos/anexamos.
    pub fn apply(&mut self, updates: &TenantUpdates) {
        for client in &updates.clients {
            match self.clients.iter_mut().find(|c| c.id == client.id) {
                Some(slot) => *slot = client.clone(),
                None => self.clients.push(client.clone()),
            }
        }

        for appointment in &updates.appointments {
            match self.appointments.iter_mut().find(|a| a.id == appointment.id) {
                Some(slot) => *slot = appointment.clone(),
                None => self.appointments.push(appointment.clone()),
            }
        }

        for adjustment in &updates.stock_adjustments {
            if let Some(product) = self.inventory.iter_mut().find(|p| p.id == adjustment.product_id) {
                product.stock += adjustment.change;
            }
        }

        self.stock_movements.extend(updates.stock_movements.iter().cloned());
    }
}

/// Conjunto parcial de coleções alteradas por uma operação do núcleo.
/// Deve ser persistido como uma unidade (tudo ou nada).
#[derive(Debug, Clone, Default)]
pub struct TenantUpdates {
    /// Clientes com `version` já incrementada.
    pub clients: Vec<Client>,
    /// Agendamentos com `version` já incrementada (1 = novo).
    pub appointments: Vec<Appointment>,
    pub stock_adjustments: Vec<StockAdjustment>,
    pub stock_movements: Vec<StockMovement>,
}

impl TenantUpdates {
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
            && self.appointments.is_empty()
            && self.stock_adjustments.is_empty()
            && self.stock_movements.is_empty()
    }
}
