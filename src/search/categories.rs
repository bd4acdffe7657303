//! Fixed subject-area catalog and query-to-endpoint resolution.

use crate::rxiv::Server;

/// A subject area recognized by the primary collection.
///
/// The catalog is a fixed table built into the binary, ordered by display
/// name, immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Machine name as the API's `category` parameter expects it
    pub machine_name: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
}

/// The primary collection's subject areas, in display-name order.
pub const CATALOG: [Category; 26] = [
    Category { machine_name: "animal_behavior_and_cognition", display_name: "Animal Behavior and Cognition" },
    Category { machine_name: "biochemistry", display_name: "Biochemistry" },
    Category { machine_name: "bioengineering", display_name: "Bioengineering" },
    Category { machine_name: "bioinformatics", display_name: "Bioinformatics" },
    Category { machine_name: "biophysics", display_name: "Biophysics" },
    Category { machine_name: "cancer_biology", display_name: "Cancer Biology" },
    Category { machine_name: "cell_biology", display_name: "Cell Biology" },
    Category { machine_name: "developmental_biology", display_name: "Developmental Biology" },
    Category { machine_name: "ecology", display_name: "Ecology" },
    Category { machine_name: "epidemiology", display_name: "Epidemiology" },
    Category { machine_name: "evolutionary_biology", display_name: "Evolutionary Biology" },
    Category { machine_name: "genetics", display_name: "Genetics" },
    Category { machine_name: "genomics", display_name: "Genomics" },
    Category { machine_name: "immunology", display_name: "Immunology" },
    Category { machine_name: "microbiology", display_name: "Microbiology" },
    Category { machine_name: "molecular_biology", display_name: "Molecular Biology" },
    Category { machine_name: "neuroscience", display_name: "Neuroscience" },
    Category { machine_name: "paleontology", display_name: "Paleontology" },
    Category { machine_name: "pathology", display_name: "Pathology" },
    Category { machine_name: "pharmacology_and_toxicology", display_name: "Pharmacology and Toxicology" },
    Category { machine_name: "physiology", display_name: "Physiology" },
    Category { machine_name: "plant_biology", display_name: "Plant Biology" },
    Category { machine_name: "scientific_communication_and_education", display_name: "Scientific Communication and Education" },
    Category { machine_name: "synthetic_biology", display_name: "Synthetic Biology" },
    Category { machine_name: "systems_biology", display_name: "Systems Biology" },
    Category { machine_name: "zoology", display_name: "Zoology" },
];

/// Words that route a query to the secondary (medical) collection.
const MEDICAL_TRIGGERS: [&str; 13] = [
    "medicine",
    "medical",
    "clinical",
    "patient",
    "disease",
    "treatment",
    "therapy",
    "diagnosis",
    "health",
    "covid",
    "cardiovascular",
    "cardiac",
    "heart",
];

/// Subset of triggers that pin the secondary category outright.
const CARDIO_TRIGGERS: [&str; 3] = ["cardiovascular", "cardiac", "heart"];

/// The pinned secondary category for cardiovascular queries.
pub const CARDIOVASCULAR_CATEGORY: &str = "cardiovascular_medicine";

/// The full catalog, in display-name order.
pub fn catalog() -> &'static [Category] {
    &CATALOG
}

/// Which endpoint and category parameter a query should hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub server: Server,
    pub category: String,
}

/// Find a catalog entry matching the query text, if any.
///
/// Case-insensitive; a hit is equality or containment in either direction
/// against the machine name or the display name. First entry wins.
fn find_in_catalog(text_lower: &str) -> Option<&'static Category> {
    CATALOG.iter().find(|c| {
        let display = c.display_name.to_lowercase();
        c.machine_name.contains(text_lower)
            || text_lower.contains(c.machine_name)
            || display.contains(text_lower)
            || text_lower.contains(&display)
    })
}

/// Replace spaces with underscores, as the API's category parameter wants.
fn underscored(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

/// Map a free-text query to a server and category parameter.
///
/// First match wins: catalog hit → primary with the matched machine name;
/// medical trigger → secondary (cardiovascular triggers pin the category);
/// otherwise primary with the raw underscored text.
pub fn resolve(text: &str) -> ResolvedQuery {
    let lower = text.trim().to_lowercase();

    if let Some(category) = find_in_catalog(&lower) {
        return ResolvedQuery {
            server: Server::BioRxiv,
            category: category.machine_name.to_string(),
        };
    }

    if MEDICAL_TRIGGERS.iter().any(|t| lower.contains(t)) {
        let category = if CARDIO_TRIGGERS.iter().any(|t| lower.contains(t)) {
            CARDIOVASCULAR_CATEGORY.to_string()
        } else {
            underscored(&lower)
        };
        return ResolvedQuery {
            server: Server::MedRxiv,
            category,
        };
    }

    ResolvedQuery {
        server: Server::BioRxiv,
        category: underscored(&lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_fixed_and_sorted() {
        assert_eq!(catalog().len(), 26);
        let names: Vec<&str> = catalog().iter().map(|c| c.display_name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        // Stateless: two reads see the same table
        assert_eq!(catalog(), catalog());
    }

    #[test]
    fn test_display_name_resolves_via_catalog() {
        let resolved = resolve("Cancer Biology");
        assert_eq!(resolved.server, Server::BioRxiv);
        assert_eq!(resolved.category, "cancer_biology");
    }

    #[test]
    fn test_machine_name_resolves_via_catalog() {
        let resolved = resolve("synthetic_biology");
        assert_eq!(resolved.category, "synthetic_biology");
    }

    #[test]
    fn test_substring_resolves_via_catalog() {
        // Query contained in a catalog name
        assert_eq!(resolve("neuro").category, "neuroscience");
        // Catalog name contained in the query
        assert_eq!(resolve("marine ecology surveys").category, "ecology");
    }

    #[test]
    fn test_medical_trigger_routes_to_secondary() {
        let resolved = resolve("monoclonal antibody treatment");
        assert_eq!(resolved.server, Server::MedRxiv);
        assert_eq!(resolved.category, "monoclonal_antibody_treatment");
    }

    #[test]
    fn test_cardiovascular_trigger_pins_category() {
        let resolved = resolve("heart failure outcomes");
        assert_eq!(resolved.server, Server::MedRxiv);
        assert_eq!(resolved.category, CARDIOVASCULAR_CATEGORY);
    }

    #[test]
    fn test_default_path_underscores_query() {
        let resolved = resolve("ancient protein folding");
        assert_eq!(resolved.server, Server::BioRxiv);
        assert_eq!(resolved.category, "ancient_protein_folding");
    }

    #[test]
    fn test_catalog_wins_over_medical_trigger() {
        // "epidemiology" is a catalog entry even though it reads medical
        let resolved = resolve("epidemiology");
        assert_eq!(resolved.server, Server::BioRxiv);
        assert_eq!(resolved.category, "epidemiology");
    }
}
