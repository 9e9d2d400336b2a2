//! Erreurs d’évaluation (récupérables : la formule saisie n’est jamais touchée).

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ErreurCalcul {
    /// Diviseur exactement nul.
    #[error("division par zéro")]
    DivisionParZero,

    /// Formule vide, ou sans aucune valeur à réduire.
    #[error("formule manquante")]
    FormuleManquante,

    /// Opérateur mal placé, opérande absent, parenthèses non appariées.
    #[error("expression invalide")]
    ExpressionInvalide,
}

impl ErreurCalcul {
    /// Message court pour l’écran de résultat.
    pub fn message_court(self) -> &'static str {
        match self {
            ErreurCalcul::DivisionParZero => "Division par zéro",
            ErreurCalcul::FormuleManquante => "Formule manquante",
            ErreurCalcul::ExpressionInvalide => "Expression invalide",
        }
    }
}
