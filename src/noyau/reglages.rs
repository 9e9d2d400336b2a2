//! Réglages d’affichage, passés explicitement au formateur et à la session.
//!
//! Pas de locale globale : le séparateur décimal est une simple valeur.

use super::decimal::ECHELLE_DIVISION;

/// Décimales affichées par défaut (la valeur stockée n’est jamais tronquée).
pub const CHIFFRES_AFFICHES_DEFAUT: usize = 10;

/// Garde-fou : on n’affiche pas plus que ce qu’une division produit.
pub const CHIFFRES_AFFICHES_MAX: usize = ECHELLE_DIVISION as usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reglages {
    pub separateur_decimal: char,
    pub separateur_milliers: char,
    pub chiffres_affiches: usize,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            separateur_decimal: '.',
            separateur_milliers: ',',
            chiffres_affiches: CHIFFRES_AFFICHES_DEFAUT,
        }
    }
}

impl Reglages {
    /// Choisit le séparateur décimal ; le séparateur de milliers suit
    /// (',' décimal => '.' pour les milliers, sinon ',').
    pub fn avec_separateur_decimal(mut self, c: char) -> Self {
        self.separateur_decimal = c;
        self.separateur_milliers = if c == ',' { '.' } else { ',' };
        self
    }

    pub fn avec_chiffres_affiches(mut self, n: usize) -> Self {
        self.chiffres_affiches = n.min(CHIFFRES_AFFICHES_MAX);
        self
    }
}
