// src/services/eligibility.rs

use std::collections::HashSet;

use crate::models::catalog::{Service, Staff};

/// Profissionais ativos capazes de executar **todos** os serviços selecionados.
///
/// Sem serviços selecionados, devolve todos os ativos (tela de navegação).
/// Comparação pelo nome do serviço, exata e sensível a maiúsculas.
/// Lista vazia é um resultado válido ("ninguém qualificado"), não um erro.
pub fn eligible_staff<'a>(all_staff: &'a [Staff], selected: &[&Service]) -> Vec<&'a Staff> {
    let required: HashSet<&str> = selected.iter().map(|s| s.name.as_str()).collect();

    all_staff
        .iter()
        .filter(|staff| staff.is_active)
        .filter(|staff| required.iter().all(|name| staff.can_perform(name)))
        .collect()
}

pub fn is_eligible(staff: &Staff, selected: &[&Service]) -> bool {
    staff.is_active && selected.iter().all(|s| staff.can_perform(&s.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::fixtures::{service, staff};

    #[test]
    fn requires_every_selected_service() {
        let alice = staff("Alice", &["Haircut"]);
        let bruno = staff("Bruno", &["Haircut", "Color", "Nails"]);
        let haircut = service("Haircut", 30, 50);
        let color = service("Color", 45, 120);
        let all = vec![alice, bruno.clone()];

        let result = eligible_staff(&all, &[&haircut, &color]);

        let names: Vec<&str> = result.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Bruno"]);
        assert!(!is_eligible(&all[0], &[&haircut, &color]));
        assert!(is_eligible(&bruno, &[&haircut, &color]));
    }

    #[test]
    fn empty_selection_lists_all_active_staff() {
        let mut inactive = staff("Carla", &["Haircut"]);
        inactive.is_active = false;
        let all = vec![staff("Alice", &["Haircut"]), inactive, staff("Davi", &[])];

        let result = eligible_staff(&all, &[]);

        let names: Vec<&str> = result.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Davi"]);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let all = vec![staff("Alice", &["haircut"])];
        let haircut = service("Haircut", 30, 50);

        assert!(eligible_staff(&all, &[&haircut]).is_empty());
    }

    #[test]
    fn inactive_staff_never_eligible() {
        let mut alice = staff("Alice", &["Haircut"]);
        alice.is_active = false;
        let haircut = service("Haircut", 30, 50);

        assert!(eligible_staff(std::slice::from_ref(&alice), &[&haircut]).is_empty());
    }
}
