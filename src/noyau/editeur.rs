//! Éditeur de formule (saisie incrémentale, sans curseur).
//!
//! Les états sont implicites dans les drapeaux ci-dessous ; chaque action les
//! fait évoluer de façon déterministe. La formule peut être transitoirement mal
//! formée : seule l’évaluation la valide.
//!
//! Règles de voisinage :
//! - multiplication implicite entre deux valeurs juxtaposées ("2π", "(1)(2)", "3!4")
//! - un opérateur remplace un + / − final ; après × / ÷ un − ouvre une parenthèse
//! - une seule factorielle, seulement juste après un nombre saisi
//! - la virgule décimale finale est un jeton "en attente", retiré d’un seul Effacer

use bigdecimal::BigDecimal;

use super::decimal::{lire_saisie, texte_brut};
use super::format::Formateur;
use super::historique::CalculHistorique;
use super::jetons::{Constante, Formule, Jeton, Operateur, Separateur};

/// Actions discrètes venant de l’interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Chiffre(u8),
    Virgule,
    Operateur(Operateur),
    Factorielle,
    Constante(Constante),
    ParentheseGauche,
    ParentheseDroite,
    Effacer,
    ToutEffacer,
    Egal,
    RappelDernier,
}

#[derive(Clone, Debug, Default)]
pub struct Editeur {
    formule: Formule,

    // nombre en cours de saisie (texte brut, '.' interne)
    chiffres: String,

    decimal_saisi: bool,
    construit_nombre: bool,
    virgule_en_attente: bool,
    calcule: bool,

    apres_parenthese_fermee: bool,
    apres_constante: bool,
    apres_factorielle: bool,

    parentheses_ouvertes: usize,

    // positions des × insérés automatiquement (retirés avec la valeur qui les a causés)
    fois_implicites: Vec<usize>,

    // dernier résultat réussi (None après un échec)
    dernier_resultat: Option<BigDecimal>,
}

impl Editeur {
    pub fn new() -> Self {
        Self::default()
    }

    /* ------------------------ Lecture ------------------------ */

    pub fn formule(&self) -> &[Jeton] {
        &self.formule
    }

    pub fn est_calcule(&self) -> bool {
        self.calcule
    }

    pub fn parentheses_ouvertes(&self) -> usize {
        self.parentheses_ouvertes
    }

    pub fn dernier_resultat(&self) -> Option<&BigDecimal> {
        self.dernier_resultat.as_ref()
    }

    /// Texte de la formule. Le nombre en cours est rendu depuis le tampon brut
    /// (zéros de fin et virgule finale visibles tels que tapés).
    pub fn affichage(&self, f: &Formateur) -> String {
        if !self.construit_nombre || self.chiffres.is_empty() {
            return f.rendre(&self.formule);
        }

        let queue = if self.virgule_en_attente { 2 } else { 1 };
        match self.formule.len().checked_sub(queue) {
            Some(debut) => {
                let mut out = f.rendre(&self.formule[..debut]);
                out.push_str(&f.formater_saisie(&self.chiffres));
                out
            }
            None => f.rendre(&self.formule),
        }
    }

    /* ------------------------ Saisie ------------------------ */

    pub fn saisir_chiffre(&mut self, chiffre: u8) {
        if chiffre > 9 {
            return;
        }

        // résultat affiché : un chiffre repart d’une formule vide
        if self.calcule {
            self.repartir_de_zero();
        }

        self.multiplication_implicite();
        self.retirer_virgule_en_attente();

        if self.construit_nombre {
            self.formule.pop();
        } else {
            self.construit_nombre = true;
            self.chiffres.clear();
        }

        // pas de zéros de tête
        if self.chiffres == "0" {
            self.chiffres.clear();
        }
        self.chiffres.push(char::from(b'0' + chiffre));
        self.pousser_nombre_en_cours();
    }

    pub fn saisir_virgule(&mut self) {
        if self.calcule {
            self.repartir_de_zero();
        }

        if self.decimal_saisi || self.chiffres.contains('.') {
            return;
        }

        if self.construit_nombre {
            self.formule.pop();
        } else {
            self.multiplication_implicite();
            self.construit_nombre = true;
            self.chiffres = "0".to_string();
        }

        self.chiffres.push('.');
        self.decimal_saisi = true;
        self.virgule_en_attente = true;

        self.pousser_nombre_en_cours();
        self.formule.push(Jeton::Separateur(Separateur::Virgule));
    }

    pub fn saisir_operateur(&mut self, op: Operateur) {
        if op == Operateur::Factorielle {
            self.saisir_factorielle();
            return;
        }

        self.fermer_nombre();
        self.effacer_drapeaux_voisinage();
        self.placer_operateur(op);
    }

    pub fn saisir_factorielle(&mut self) {
        if self.apres_factorielle || !self.construit_nombre {
            return;
        }

        self.fermer_nombre();
        self.formule
            .push(Jeton::Operateur(Operateur::Factorielle));
        self.effacer_drapeaux_voisinage();
        self.apres_factorielle = true;
    }

    pub fn saisir_constante(&mut self, c: Constante) {
        self.fermer_nombre();
        if self.derniere_termine_une_valeur() {
            self.pousser_fois_implicite();
        }
        self.formule.push(Jeton::Constante(c));
        self.effacer_drapeaux_voisinage();
        self.apres_constante = true;
    }

    pub fn parenthese_gauche(&mut self) {
        self.fermer_nombre();
        if self.derniere_termine_une_valeur() {
            self.pousser_fois_implicite();
        }
        self.formule
            .push(Jeton::Separateur(Separateur::ParentheseGauche));
        self.parentheses_ouvertes += 1;
        self.effacer_drapeaux_voisinage();
    }

    /// Sans parenthèse ouverte : ignorée.
    pub fn parenthese_droite(&mut self) {
        if self.parentheses_ouvertes == 0 {
            return;
        }

        self.fermer_nombre();
        self.parentheses_ouvertes = self.parentheses_ouvertes.saturating_sub(1);
        self.formule
            .push(Jeton::Separateur(Separateur::ParentheseDroite));
        self.effacer_drapeaux_voisinage();
        self.apres_parenthese_fermee = true;
    }

    /* ------------------------ Effacement ------------------------ */

    /// Retire le dernier effet visible.
    pub fn effacer(&mut self) {
        self.calcule = false;
        self.effacer_drapeaux_voisinage();

        // 1) virgule en attente : on la retire seule
        if self.virgule_en_attente {
            self.virgule_en_attente = false;
            self.decimal_saisi = false;
            if matches!(self.formule.last(), Some(Jeton::Separateur(Separateur::Virgule))) {
                self.formule.pop();
            }
            if self.chiffres.ends_with('.') {
                self.chiffres.pop();
            }
            return;
        }

        let en_cours = self.construit_nombre;
        let tampon = std::mem::take(&mut self.chiffres);
        self.construit_nombre = false;
        self.decimal_saisi = false;

        match self.formule.pop() {
            None => {}

            // 2) nombre : on retire son dernier chiffre
            Some(Jeton::Nombre(v)) => {
                let mut source = if en_cours && !tampon.is_empty() {
                    tampon
                } else {
                    texte_brut(&v)
                };
                source.pop();

                if !(source.is_empty() || source == "-") {
                    self.reprendre_nombre(source);
                    return;
                }
            }

            // 3) parenthèses : le compteur suit
            Some(Jeton::Separateur(Separateur::ParentheseGauche)) => {
                self.parentheses_ouvertes = self.parentheses_ouvertes.saturating_sub(1);
            }
            Some(Jeton::Separateur(Separateur::ParentheseDroite)) => {
                self.parentheses_ouvertes += 1;
            }

            Some(_) => {}
        }

        // le × implicite n’a plus de raison d’être
        let n = self.formule.len();
        self.fois_implicites.retain(|&i| i < n);
        if n > 0 && self.fois_implicites.last() == Some(&(n - 1)) {
            self.formule.pop();
            self.fois_implicites.pop();
        }

        // drapeaux recalculés plutôt qu’effacés : le × implicite vient de partir
        // avec son jeton, le prochain chiffre doit pouvoir le réinsérer
        self.resynchroniser();
    }

    /// Tout effacer : formule, tampon, drapeaux, dernier résultat.
    pub fn tout_effacer(&mut self) {
        self.repartir_de_zero();
        self.dernier_resultat = None;
    }

    /* ------------------------ Calcul / rappel ------------------------ */

    /// Ferme le nombre en cours, referme les parenthèses ouvertes et rend
    /// la formule à évaluer. Un second '=' réévalue la même formule.
    pub fn egal(&mut self) -> Formule {
        if !self.calcule {
            self.fermer_nombre();
        }

        for _ in 0..self.parentheses_ouvertes {
            self.formule
                .push(Jeton::Separateur(Separateur::ParentheseDroite));
        }
        self.parentheses_ouvertes = 0;

        self.calcule = true;
        self.formule.clone()
    }

    /// Mémorise l’issue de l’évaluation (None si échec).
    pub fn enregistrer_resultat(&mut self, resultat: Option<BigDecimal>) {
        self.dernier_resultat = resultat;
    }

    /// Formule non vide : l’avant-dernier calcul (le dernier est peut-être à l’écran).
    /// Formule vide : le dernier, dès qu’un seul calcul existe (pas de seuil à deux).
    pub fn choisir_rappel<'a>(
        &self,
        historique: &'a [CalculHistorique],
    ) -> Option<&'a CalculHistorique> {
        if self.formule.is_empty() {
            historique.last()
        } else {
            historique
                .len()
                .checked_sub(2)
                .and_then(|i| historique.get(i))
        }
    }

    /// Remplace la formule par un calcul rappelé, prêt à être réévalué.
    pub fn charger(&mut self, formule: &[Jeton]) -> Formule {
        self.repartir_de_zero();
        self.formule = formule.to_vec();

        let ouvertes = formule
            .iter()
            .filter(|j| matches!(j, Jeton::Separateur(Separateur::ParentheseGauche)))
            .count();
        let fermees = formule
            .iter()
            .filter(|j| matches!(j, Jeton::Separateur(Separateur::ParentheseDroite)))
            .count();
        self.parentheses_ouvertes = ouvertes.saturating_sub(fermees);

        self.calcule = true;
        self.formule.clone()
    }

    /* ------------------------ Interne ------------------------ */

    fn repartir_de_zero(&mut self) {
        self.formule.clear();
        self.chiffres.clear();
        self.decimal_saisi = false;
        self.construit_nombre = false;
        self.virgule_en_attente = false;
        self.calcule = false;
        self.effacer_drapeaux_voisinage();
        self.parentheses_ouvertes = 0;
        self.fois_implicites.clear();
    }

    fn effacer_drapeaux_voisinage(&mut self) {
        self.apres_parenthese_fermee = false;
        self.apres_constante = false;
        self.apres_factorielle = false;
    }

    fn derniere_termine_une_valeur(&self) -> bool {
        self.formule.last().is_some_and(Jeton::termine_une_valeur)
    }

    fn pousser_fois_implicite(&mut self) {
        self.fois_implicites.push(self.formule.len());
        self.formule.push(Jeton::Operateur(Operateur::Fois));
    }

    /// Chiffre (ou virgule) après constante, ')' ou '!' : × implicite.
    fn multiplication_implicite(&mut self) {
        if self.apres_constante || self.apres_parenthese_fermee || self.apres_factorielle {
            self.pousser_fois_implicite();
            self.effacer_drapeaux_voisinage();
        }
    }

    fn retirer_virgule_en_attente(&mut self) {
        if !self.virgule_en_attente {
            return;
        }
        self.virgule_en_attente = false;
        if matches!(self.formule.last(), Some(Jeton::Separateur(Separateur::Virgule))) {
            self.formule.pop();
        }
    }

    fn pousser_nombre_en_cours(&mut self) {
        if let Some(v) = lire_saisie(&self.chiffres) {
            self.formule.push(Jeton::nombre(v));
        }
    }

    /// Termine le nombre en cours. Juste après un résultat réussi, la formule
    /// repart de ce résultat (pour enchaîner "= + 1").
    fn fermer_nombre(&mut self) {
        if self.calcule {
            self.calcule = false;
            if let Some(r) = self.dernier_resultat.clone() {
                self.repartir_de_zero();
                self.formule.push(Jeton::nombre(r));
            }
        }

        self.retirer_virgule_en_attente();
        self.decimal_saisi = false;
        self.construit_nombre = false;
        self.chiffres.clear();
    }

    /// Règle de réécriture des opérateurs voisins.
    fn placer_operateur(&mut self, op: Operateur) {
        let derniere = self.formule.last().cloned();
        match derniere {
            // + / − final : remplacé
            Some(Jeton::Operateur(Operateur::Plus | Operateur::Moins)) => {
                self.formule.pop();
                self.placer_operateur(op);
            }

            // × / ÷ final : un − devient "×(−", le reste remplace
            Some(Jeton::Operateur(Operateur::Fois | Operateur::Divise)) => {
                if op == Operateur::Moins {
                    self.formule
                        .push(Jeton::Separateur(Separateur::ParentheseGauche));
                    self.parentheses_ouvertes += 1;
                } else {
                    self.formule.pop();
                }
                self.formule.push(Jeton::Operateur(op));
            }

            // début de formule ou de parenthèse : seul le − (unaire) est admis
            None | Some(Jeton::Separateur(Separateur::ParentheseGauche)) => {
                if op == Operateur::Moins {
                    self.formule.push(Jeton::Operateur(op));
                }
            }

            // valeur, ')' ou '!' : ajout simple
            Some(_) => self.formule.push(Jeton::Operateur(op)),
        }
    }

    /// Reprend la saisie d’un nombre à partir d’un texte brut ("12", "3.", "-4.5").
    fn reprendre_nombre(&mut self, source: String) {
        self.decimal_saisi = source.contains('.');
        self.virgule_en_attente = source.ends_with('.');
        self.chiffres = source;
        self.construit_nombre = true;

        self.pousser_nombre_en_cours();
        if self.virgule_en_attente {
            self.formule.push(Jeton::Separateur(Separateur::Virgule));
        }
    }

    /// Après un effacement : les drapeaux de voisinage reflètent le nouveau
    /// dernier jeton, et un nombre final redevient éditable.
    fn resynchroniser(&mut self) {
        match self.formule.last().cloned() {
            Some(Jeton::Nombre(v)) => {
                self.formule.pop();
                self.reprendre_nombre(texte_brut(&v));
            }
            Some(Jeton::Constante(_)) => self.apres_constante = true,
            Some(Jeton::Separateur(Separateur::ParentheseDroite)) => {
                self.apres_parenthese_fermee = true;
            }
            Some(Jeton::Operateur(Operateur::Factorielle)) => self.apres_factorielle = true,
            _ => {}
        }
    }
}
