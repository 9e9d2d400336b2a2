//! Session de calcul : éditeur + évaluation + historique + écran de résultat.
//!
//! Point d’entrée unique de l’interface : `appliquer(Action)`.

use tracing::{debug, info};

use super::editeur::{Action, Editeur};
use super::eval::evaluer;
use super::format::Formateur;
use super::historique::{CalculHistorique, DepotHistorique};
use super::jetons::{decrire_jetons, Formule};
use super::reglages::Reglages;

pub struct Session {
    editeur: Editeur,
    formateur: Formateur,
    depot: Box<dyn DepotHistorique>,

    // texte de l’écran de résultat (valeur formatée ou message d’erreur)
    resultat: String,
}

impl Session {
    pub fn new(depot: Box<dyn DepotHistorique>, reglages: Reglages) -> Self {
        Self {
            editeur: Editeur::new(),
            formateur: Formateur::new(reglages),
            depot,
            resultat: String::new(),
        }
    }

    /* ------------------------ Lecture ------------------------ */

    pub fn editeur(&self) -> &Editeur {
        &self.editeur
    }

    pub fn formateur(&self) -> &Formateur {
        &self.formateur
    }

    pub fn formule_affichee(&self) -> String {
        self.editeur.affichage(&self.formateur)
    }

    pub fn resultat_affiche(&self) -> &str {
        &self.resultat
    }

    pub fn historique(&self) -> Vec<CalculHistorique> {
        self.depot.lire_tout()
    }

    /// Changer les réglages réaffiche le dernier résultat réussi.
    pub fn changer_reglages(&mut self, reglages: Reglages) {
        self.formateur = Formateur::new(reglages);
        if let Some(r) = self.editeur.dernier_resultat() {
            if self.editeur.est_calcule() {
                self.resultat = self.formateur.formater_resultat(Some(r));
            }
        }
    }

    /* ------------------------ Actions ------------------------ */

    pub fn appliquer(&mut self, action: Action) {
        match action {
            Action::Chiffre(c) => {
                self.effacer_resultat_si_calcule();
                self.editeur.saisir_chiffre(c);
            }
            Action::Virgule => {
                self.effacer_resultat_si_calcule();
                self.editeur.saisir_virgule();
            }
            Action::Operateur(op) => self.editeur.saisir_operateur(op),
            Action::Factorielle => self.editeur.saisir_factorielle(),
            Action::Constante(c) => self.editeur.saisir_constante(c),
            Action::ParentheseGauche => self.editeur.parenthese_gauche(),
            Action::ParentheseDroite => self.editeur.parenthese_droite(),
            Action::Effacer => {
                self.resultat.clear();
                self.editeur.effacer();
            }
            Action::ToutEffacer => {
                self.resultat.clear();
                self.editeur.tout_effacer();
            }
            Action::Egal => {
                let formule = self.editeur.egal();
                self.calculer(formule);
            }
            Action::RappelDernier => self.rappeler(),
        }
    }

    /// Évalue ; succès => écran + historique, échec => message court.
    fn calculer(&mut self, formule: Formule) {
        match evaluer(&formule) {
            Ok(v) => {
                debug!(formule = %decrire_jetons(&formule), resultat = %v, "calcul réussi");
                self.resultat = self.formateur.formater_resultat(Some(&v));
                self.depot.ajouter(CalculHistorique::new(&formule, v.clone()));
                self.editeur.enregistrer_resultat(Some(v));
            }
            Err(e) => {
                debug!(formule = %decrire_jetons(&formule), erreur = %e, "calcul refusé");
                self.resultat = e.message_court().to_string();
                self.editeur.enregistrer_resultat(None);
            }
        }
    }

    /// Rappel : recharge un calcul passé puis le réévalue (et le réinscrit).
    fn rappeler(&mut self) {
        let historique = self.depot.lire_tout();
        let Some(calcul) = self.editeur.choisir_rappel(&historique) else {
            debug!(
                total = historique.len(),
                formule = %decrire_jetons(self.editeur.formule()),
                "rien à rappeler"
            );
            return;
        };

        info!(formule = %decrire_jetons(calcul.formule()), "rappel");
        let formule = self.editeur.charger(calcul.formule());
        self.calculer(formule);
    }

    fn effacer_resultat_si_calcule(&mut self) {
        if self.editeur.est_calcule() {
            self.resultat.clear();
        }
    }
}
