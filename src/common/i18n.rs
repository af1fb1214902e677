// src/common/i18n.rs
//
// Textos voltados ao usuário. Idiomas suportados: "pt" e "en" (padrão).

use crate::common::error::AppError;
use crate::models::notice::Notice;

fn is_pt(lang: &str) -> bool {
    lang == "pt"
}

fn tr(pt: bool, pt_text: &str, en_text: &str) -> String {
    let text = if pt { pt_text } else { en_text };
    text.to_string()
}

pub fn error_message(err: &AppError, lang: &str) -> String {
    let pt = is_pt(lang);
    match err {
        AppError::ValidationError(_) => {
            tr(pt, "Um ou mais campos são inválidos.", "One or more fields are invalid.")
        }
        AppError::InvalidBooking(fields) => {
            let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
            if pt {
                format!("Preencha corretamente: {}.", names.join(", "))
            } else {
                format!("Missing or invalid fields: {}.", names.join(", "))
            }
        }
        AppError::AppointmentNotFound(_) => {
            tr(pt, "Agendamento não encontrado.", "Appointment not found.")
        }
        AppError::ClientNotFound(_) => {
            tr(pt, "Cliente não encontrado.", "Client not found.")
        }
        AppError::ServiceNotFound(_) => {
            tr(pt, "Serviço não encontrado.", "Service not found.")
        }
        AppError::InsufficientStock { available, requested, .. } => {
            if pt {
                format!("Estoque insuficiente (saldo {available}, necessário {requested}).")
            } else {
                format!("Insufficient stock (available {available}, required {requested}).")
            }
        }
        AppError::ConcurrentModification(_) => {
            tr(pt, "Os dados foram alterados por outra pessoa. Tente novamente.", "The data was changed by someone else. Please try again.")
        }
        AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
            tr(pt, "Ocorreu um erro inesperado.", "An unexpected error occurred.")
        }
    }
}

pub fn notice_message(notice: &Notice, lang: &str) -> String {
    let pt = is_pt(lang);
    match notice {
        Notice::AppointmentCreated => {
            tr(pt, "Agendamento criado com sucesso!", "Appointment created successfully!")
        }
        Notice::AppointmentUpdated => {
            tr(pt, "Agendamento atualizado com sucesso!", "Appointment updated successfully!")
        }
        Notice::PackageRedeemed { package_name, remaining } => {
            if pt {
                format!("Crédito do pacote \"{package_name}\" utilizado. Restam {remaining}.")
            } else {
                format!("Credit from package \"{package_name}\" redeemed. {remaining} left.")
            }
        }
        Notice::RedemptionUnavailable => {
            tr(pt, "Nenhum crédito de pacote disponível para este serviço. Registre o pagamento normalmente.", "No package credit available for this service. Record the payment as usual.")
        }
        Notice::PackageRequiresSingleService => {
            tr(pt, "Pacotes só podem ser usados em agendamentos com um único serviço.", "Packages can only be redeemed for single-service appointments.")
        }
        Notice::NegativeStock { product_name, stock, .. } => {
            if pt {
                format!("Atenção: o estoque de \"{product_name}\" ficou em {stock}.")
            } else {
                format!("Warning: stock for \"{product_name}\" is now {stock}.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::BookingField;

    #[test]
    fn falls_back_to_english() {
        let msg = notice_message(&Notice::AppointmentCreated, "de");
        assert_eq!(msg, "Appointment created successfully!");
    }

    #[test]
    fn invalid_booking_names_fields_in_portuguese() {
        let err = AppError::InvalidBooking(vec![BookingField::Staff, BookingField::Services]);
        assert_eq!(error_message(&err, "pt"), "Preencha corretamente: staffId, serviceIds.");
    }
}
