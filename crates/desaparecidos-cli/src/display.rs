//! Terminal rendering for registry records.
//!
//! A person is shown as a vertical card grouped into sections; empty
//! fields and sections with nothing to show are skipped. Listings are one
//! row per person followed by a pagination footer.

use desaparecidos_core::format::{format_date, format_date_time, format_phone, truncate_text};
use desaparecidos_core::{Person, Statistics};
use desaparecidos_state::Pagination;

const LABEL_WIDTH: usize = 24;
const ROW_DESCRIPTION_CHARS: usize = 60;

/// A titled group of label/value rows.
#[derive(Debug, PartialEq)]
pub struct Section {
    pub header: &'static str,
    pub rows: Vec<(&'static str, String)>,
}

impl Section {
    fn new(header: &'static str, rows: Vec<(&'static str, Option<String>)>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|(label, value)| {
                value
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (label, v))
            })
            .collect();
        Self { header, rows }
    }
}

/// Card sections for one person, empty ones removed.
pub fn card_sections(person: &Person) -> Vec<Section> {
    let sections = vec![
        Section::new(
            "Identificação",
            vec![
                ("id", Some(person.id.to_string())),
                ("nome", Some(person.full_name())),
                ("idade", person.age.map(|a| format!("{a} anos"))),
                ("situação", Some(person.status.label().to_string())),
            ],
        ),
        Section::new(
            "Desaparecimento",
            vec![
                ("data", Some(format_date(&person.disappeared_at))),
                ("local", Some(person.disappearance_location.clone())),
                ("descrição", Some(person.description.clone())),
                ("observações", person.observations.clone()),
            ],
        ),
        Section::new(
            "Contato",
            vec![
                ("telefone", person.contact_phone.as_deref().map(format_phone)),
                ("foto", person.photo_url.clone()),
            ],
        ),
        Section::new(
            "Registro",
            vec![
                ("criado em", Some(format_date_time(&person.created_at))),
                ("atualizado em", Some(format_date_time(&person.updated_at))),
            ],
        ),
    ];
    sections.into_iter().filter(|s| !s.rows.is_empty()).collect()
}

/// Print a single person as a vertical card.
pub fn print_person_card(person: &Person) {
    println!("=== {} ===", person.full_name());
    println!("{}", person.status.label());
    println!();

    for section in card_sections(person) {
        println!("{}", section.header);
        for (label, value) in &section.rows {
            println!("  {label:<LABEL_WIDTH$} {value}");
        }
        println!();
    }
}

/// One listing row: id, name, status, date, location and a short description.
pub fn person_row(person: &Person) -> String {
    format!(
        "{:>8}  {:<32} {:<12} {:<10}  {}\n          {}",
        person.id,
        truncate_text(&person.full_name(), 32),
        person.status.label(),
        format_date(&person.disappeared_at),
        person.disappearance_location,
        truncate_text(&person.description, ROW_DESCRIPTION_CHARS),
    )
}

pub fn pagination_footer(pagination: &Pagination) -> String {
    if pagination.total_pages == 0 {
        return "Nenhum registro encontrado".to_string();
    }
    format!(
        "Página {} de {} ({} registros)",
        pagination.current_page + 1,
        pagination.total_pages,
        pagination.total_elements
    )
}

/// Print a page of results.
pub fn print_person_list(persons: &[Person], pagination: &Pagination) {
    for person in persons {
        println!("{}", person_row(person));
    }
    if !persons.is_empty() {
        println!();
    }
    println!("{}", pagination_footer(pagination));
}

pub fn print_statistics(stats: &Statistics) {
    println!("Estatísticas");
    println!("  {:<LABEL_WIDTH$} {}", "total", stats.total);
    println!("  {:<LABEL_WIDTH$} {}", "desaparecidas", stats.missing);
    println!("  {:<LABEL_WIDTH$} {}", "localizadas", stats.located);
}
