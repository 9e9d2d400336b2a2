//! Noyau de la calculatrice à jetons
//!
//! Organisation interne :
//! - jetons.rs     : nombres, constantes, opérateurs, séparateurs
//! - decimal.rs    : division à 100 décimales, découpage/lecture des décimaux
//! - constantes.rs : π (Machin) et e, 100 décimales, en cache
//! - eval.rs       : factorielle, parenthèses, × ÷, puis + −
//! - format.rs     : formule et résultat -> texte
//! - reglages.rs   : séparateurs, chiffres affichés
//! - editeur.rs    : saisie touche par touche
//! - historique.rs : calculs réussis (mémoire ou JSON sur disque)
//! - session.rs    : tout relié, piloté par des `Action`

pub mod constantes;
pub mod decimal;
pub mod editeur;
pub mod erreur;
pub mod eval;
pub mod format;
pub mod historique;
pub mod jetons;
pub mod reglages;
pub mod session;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use editeur::Action;
pub use historique::{DepotHistorique, HistoriqueFichier, HistoriqueMemoire};
pub use reglages::Reglages;
pub use session::Session;
