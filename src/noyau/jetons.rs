// src/noyau/jetons.rs

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::constantes::{e_decimal, pi_decimal};

/// Constantes nommées (π, e).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constante {
    Pi,
    E,
}

impl Constante {
    /// Approximation décimale fixe (100 décimales, calculée une seule fois).
    pub fn valeur(self) -> BigDecimal {
        match self {
            Constante::Pi => pi_decimal(),
            Constante::E => e_decimal(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operateur {
    Plus,
    Moins,
    Fois,
    Divise,
    Factorielle, // postfixe
}

impl Operateur {
    /// × et ÷ : réduits avant + et −.
    pub fn est_prioritaire(self) -> bool {
        matches!(self, Operateur::Fois | Operateur::Divise)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separateur {
    ParentheseGauche,
    ParentheseDroite,
    // Virgule décimale "en attente" (saisie d’un nombre pas encore suivi d’un chiffre)
    Virgule,
}

/// Un symbole de formule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Jeton {
    Nombre(BigDecimal),
    Constante(Constante),
    Operateur(Operateur),
    Separateur(Separateur),
}

/// Formule = suite ordonnée de jetons (éventuellement mal formée pendant la saisie).
pub type Formule = Vec<Jeton>;

impl Jeton {
    /// Nombre stocké sous forme normalisée (sans zéros de fin).
    pub fn nombre(v: BigDecimal) -> Self {
        Jeton::Nombre(v.normalized())
    }

    pub fn est_valeur(&self) -> bool {
        matches!(self, Jeton::Nombre(_) | Jeton::Constante(_))
    }

    /// Valeur numérique : Some pour Nombre/Constante, None sinon.
    pub fn valeur(&self) -> Option<BigDecimal> {
        match self {
            Jeton::Nombre(v) => Some(v.clone()),
            Jeton::Constante(c) => Some(c.valeur()),
            Jeton::Operateur(_) | Jeton::Separateur(_) => None,
        }
    }

    /// Vrai si le jeton "termine" une valeur : un nombre, une constante,
    /// une parenthèse fermante ou une factorielle.
    /// Sert à la multiplication implicite ("2π", "(1)(2)", "3!(2)").
    pub fn termine_une_valeur(&self) -> bool {
        matches!(
            self,
            Jeton::Nombre(_)
                | Jeton::Constante(_)
                | Jeton::Separateur(Separateur::ParentheseDroite)
                | Jeton::Operateur(Operateur::Factorielle)
        )
    }
}

/// Format utilitaire (journal) : liste de jetons en texte brut, séparés par des espaces.
pub fn decrire_jetons(jetons: &[Jeton]) -> String {
    let mut out = Vec::with_capacity(jetons.len());
    for j in jetons {
        let s = match j {
            Jeton::Nombre(v) => v.to_string(),
            Jeton::Constante(Constante::Pi) => "pi".to_string(),
            Jeton::Constante(Constante::E) => "e".to_string(),

            Jeton::Operateur(Operateur::Plus) => "+".to_string(),
            Jeton::Operateur(Operateur::Moins) => "-".to_string(),
            Jeton::Operateur(Operateur::Fois) => "*".to_string(),
            Jeton::Operateur(Operateur::Divise) => "/".to_string(),
            Jeton::Operateur(Operateur::Factorielle) => "!".to_string(),

            Jeton::Separateur(Separateur::ParentheseGauche) => "(".to_string(),
            Jeton::Separateur(Separateur::ParentheseDroite) => ")".to_string(),
            Jeton::Separateur(Separateur::Virgule) => ".".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
