// src/models/notice.rs

use uuid::Uuid;

/// Avisos para o usuário (estilo "toast"). O núcleo só produz os valores;
/// o texto final é montado na camada HTTP conforme o idioma (`common::i18n`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    AppointmentCreated,
    AppointmentUpdated,
    PackageRedeemed { package_name: String, remaining: i32 },
    /// Resgate pedido, mas nenhum crédito disponível: segue o fluxo normal de pagamento.
    RedemptionUnavailable,
    /// Resgate pedido com mais de um serviço: não suportado, ignorado.
    PackageRequiresSingleService,
    NegativeStock { product_id: Uuid, product_name: String, stock: i32 },
}

impl Notice {
    pub fn code(&self) -> &'static str {
        match self {
            Notice::AppointmentCreated => "APPOINTMENT_CREATED",
            Notice::AppointmentUpdated => "APPOINTMENT_UPDATED",
            Notice::PackageRedeemed { .. } => "PACKAGE_REDEEMED",
            Notice::RedemptionUnavailable => "REDEMPTION_UNAVAILABLE",
            Notice::PackageRequiresSingleService => "PACKAGE_REQUIRES_SINGLE_SERVICE",
            Notice::NegativeStock { .. } => "NEGATIVE_STOCK",
        }
    }
}
