//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : porter la session de calcul et les réglages modifiables à l’écran,
//! et traduire les touches clavier en actions.
//!
//! Contrats :
//! - Aucune évaluation ici : tout passe par `Session::appliquer`.
//! - Réglages bornés (chiffres affichés).

use crate::noyau::jetons::{Constante, Operateur};
use crate::noyau::{Action, DepotHistorique, Reglages, Session};

pub struct AppCalc {
    pub session: Session,

    // --- paramètres ---
    pub reglages: Reglages,
}

impl AppCalc {
    pub fn new(depot: Box<dyn DepotHistorique>, reglages: Reglages) -> Self {
        Self {
            session: Session::new(depot, reglages.clone()),
            reglages,
        }
    }

    /* ------------------------ Actions ------------------------ */

    pub fn appliquer(&mut self, action: Action) {
        self.session.appliquer(action);
    }

    /// Échap : tout effacer.
    pub fn reset_total(&mut self) {
        self.session.appliquer(Action::ToutEffacer);
    }

    /* ------------------------ Réglages ------------------------ */

    /// Virgule décimale ',' (milliers '.') ou point décimal '.' (milliers ',').
    pub fn set_virgule_decimale(&mut self, virgule: bool) {
        let sep = if virgule { ',' } else { '.' };
        self.reglages = self.reglages.clone().avec_separateur_decimal(sep);
        self.session.changer_reglages(self.reglages.clone());
    }

    /// Garde-fou : limite les chiffres affichés.
    pub fn set_chiffres(&mut self, chiffres: usize) {
        self.reglages = self.reglages.clone().avec_chiffres_affiches(chiffres);
        self.session.changer_reglages(self.reglages.clone());
    }
}

/// Caractère tapé -> action. '.' et ',' valent tous deux la virgule décimale.
pub fn action_clavier(c: char) -> Option<Action> {
    let a = match c {
        '0'..='9' => Action::Chiffre(c as u8 - b'0'),
        '.' | ',' => Action::Virgule,
        '+' => Action::Operateur(Operateur::Plus),
        '-' | '−' => Action::Operateur(Operateur::Moins),
        '*' | 'x' | '×' => Action::Operateur(Operateur::Fois),
        '/' | '÷' => Action::Operateur(Operateur::Divise),
        '!' => Action::Factorielle,
        '(' => Action::ParentheseGauche,
        ')' => Action::ParentheseDroite,
        'p' | 'π' => Action::Constante(Constante::Pi),
        'e' => Action::Constante(Constante::E),
        '=' => Action::Egal,
        'r' => Action::RappelDernier,
        _ => return None,
    };
    Some(a)
}
