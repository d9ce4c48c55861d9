//! Built-in domain tables.
//!
//! The default deployment targets French legal documents about personal data
//! retention (GDPR). Both tables can be extended or replaced from `.veritas.toml`.

use std::collections::HashMap;

/// Default IDF boost factors for data-retention and GDPR vocabulary.
static DOMAIN_WEIGHTS: &[(&str, f32)] = &[
    // Retention periods
    ("durée", 3.0),
    ("conservation", 3.0),
    ("délai", 3.0),
    ("stockage", 2.5),
    ("archivage", 2.5),
    ("effacement", 3.0),
    ("suppression", 2.5),
    ("rétention", 3.0),
    ("temporaire", 2.0),
    ("permanent", 2.0),
    ("période", 2.0),
    ("temps", 2.0),
    ("limité", 2.0),
    ("illimité", 2.0),
    ("ans", 2.5),
    ("mois", 2.5),
    ("jours", 2.5),
    // Regulation
    ("rgpd", 2.0),
    ("gdpr", 2.0),
    ("règlement", 1.5),
    ("protection", 1.5),
    ("donnée", 2.0),
    ("personnelle", 2.0),
    ("régulation", 1.5),
    ("loi", 1.5),
    ("article", 1.5),
    ("paragraphe", 1.2),
    ("alinéa", 1.2),
    ("disposition", 1.2),
    // Processing principles
    ("minimisation", 2.0),
    ("finalité", 2.0),
    ("limitation", 2.5),
    ("proportionnalité", 2.0),
    ("nécessaire", 2.0),
    ("pertinent", 1.5),
    ("adéquat", 1.5),
    ("exactitude", 1.5),
    // Obligations
    ("responsable", 1.5),
    ("traitement", 1.5),
    ("obligation", 1.5),
    ("conformité", 1.5),
    ("registre", 2.0),
    ("documentation", 1.5),
    ("mesure", 1.5),
    ("technique", 1.0),
    ("organisationnel", 1.0),
    ("sécurité", 1.0),
    // Exceptions
    ("archive", 2.0),
    ("statistique", 1.5),
    ("recherche", 1.5),
    ("historique", 1.5),
    ("scientifique", 1.5),
    ("intérêt", 1.5),
    ("public", 1.5),
    ("légal", 1.5),
];

/// Default query expansion table.
static SYNONYMS: &[(&str, &[&str])] = &[
    ("durée", &["temps", "période", "délai"]),
    ("conservation", &["stockage", "rétention", "archivage"]),
    ("effacement", &["suppression", "destruction", "élimination"]),
    ("rgpd", &["gdpr", "règlement", "protection"]),
    ("limitation", &["restriction", "bornage", "plafonnement"]),
];

/// Returns the built-in domain weight table.
pub fn default_domain_weights() -> HashMap<String, f32> {
    DOMAIN_WEIGHTS
        .iter()
        .map(|(term, weight)| ((*term).to_string(), *weight))
        .collect()
}

/// Returns the built-in synonym table.
pub fn default_synonyms() -> HashMap<String, Vec<String>> {
    SYNONYMS
        .iter()
        .map(|(term, related)| {
            (
                (*term).to_string(),
                related.iter().map(|r| (*r).to_string()).collect(),
            )
        })
        .collect()
}
