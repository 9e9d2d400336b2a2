// src/noyau/format.rs

use bigdecimal::BigDecimal;

use super::decimal::{arrondir, parties};
use super::jetons::{Constante, Jeton, Operateur, Separateur};
use super::reglages::Reglages;

/* ------------------------ Helpers texte ------------------------ */

/// "1234567" -> "1,234,567" (groupes de 3 depuis la droite).
fn grouper(entier: &str, sep: char) -> String {
    let n = entier.chars().count();
    let mut out = String::with_capacity(n + n / 3);
    for (i, c) in entier.chars().enumerate() {
        if i > 0 && (n - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

/* ------------------------ Formateur ------------------------ */

/// Rendu des formules et des résultats selon des réglages explicites.
#[derive(Clone, Debug, Default)]
pub struct Formateur {
    reglages: Reglages,
}

impl Formateur {
    pub fn new(reglages: Reglages) -> Self {
        Self { reglages }
    }

    /// Formule -> texte : concaténation des glyphes, dans l’ordre.
    pub fn rendre(&self, jetons: &[Jeton]) -> String {
        let mut out = String::new();
        for j in jetons {
            out.push_str(&self.glyphe(j));
        }
        out
    }

    fn glyphe(&self, j: &Jeton) -> String {
        match j {
            Jeton::Nombre(v) => self.formater_nombre(v),

            Jeton::Constante(Constante::Pi) => "π".to_string(),
            Jeton::Constante(Constante::E) => "e".to_string(),

            Jeton::Operateur(Operateur::Plus) => "+".to_string(),
            Jeton::Operateur(Operateur::Moins) => "−".to_string(),
            Jeton::Operateur(Operateur::Fois) => "×".to_string(),
            Jeton::Operateur(Operateur::Divise) => "÷".to_string(),
            Jeton::Operateur(Operateur::Factorielle) => "!".to_string(),

            Jeton::Separateur(Separateur::ParentheseGauche) => "(".to_string(),
            Jeton::Separateur(Separateur::ParentheseDroite) => ")".to_string(),
            Jeton::Separateur(Separateur::Virgule) => self.reglages.separateur_decimal.to_string(),
        }
    }

    /// Résultat -> texte ; absence de valeur => chaîne vide.
    pub fn formater_resultat(&self, v: Option<&BigDecimal>) -> String {
        match v {
            Some(v) => self.formater_nombre(v),
            None => String::new(),
        }
    }

    /// Décimal -> texte groupé, arrondi à `chiffres_affiches`, sans zéros de fin
    /// (ni séparateur décimal orphelin). Un entier exact n’a pas de partie fractionnaire.
    pub fn formater_nombre(&self, v: &BigDecimal) -> String {
        let r = arrondir(v, self.reglages.chiffres_affiches as i64);
        let p = parties(&r);

        let mut out = String::new();
        if p.negatif {
            out.push('-');
        }
        out.push_str(&grouper(&p.entier, self.reglages.separateur_milliers));

        let fraction = p.fraction.trim_end_matches('0');
        if !fraction.is_empty() {
            out.push(self.reglages.separateur_decimal);
            out.push_str(fraction);
        }
        out
    }

    /// Tampon de saisie brut ("1234.50", "0.", "-6") -> texte affiché.
    /// Contrairement à `formater_nombre`, rien n’est retiré : on montre ce qui est tapé.
    pub fn formater_saisie(&self, chiffres: &str) -> String {
        let (signe, reste) = match chiffres.strip_prefix('-') {
            Some(r) => ("-", r),
            None => ("", chiffres),
        };

        let mut out = String::from(signe);
        match reste.split_once('.') {
            Some((entier, fraction)) => {
                out.push_str(&grouper(entier, self.reglages.separateur_milliers));
                out.push(self.reglages.separateur_decimal);
                out.push_str(fraction);
            }
            None => out.push_str(&grouper(reste, self.reglages.separateur_milliers)),
        }
        out
    }
}
