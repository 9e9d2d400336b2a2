// src/noyau/decimal.rs
//
// Outils décimaux “scalés” : le BigDecimal est vu comme (mantisse BigInt, échelle).
// - division à échelle fixe, arrondi HALF_UP (égalité => loin de zéro)
// - arrondi d’affichage
// - découpage texte (signe / partie entière / partie fractionnaire)
// - lecture du tampon de saisie ("12.", "0.05", "-3")

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};

/// Nombre de décimales conservées par une division.
pub const ECHELLE_DIVISION: i64 = 100;

pub fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

/// num / den arrondi au plus proche ; à égalité on s’éloigne de zéro.
/// Précondition : den != 0.
pub fn div_arrondi(num: &BigInt, den: &BigInt) -> BigInt {
    let negatif = num.is_negative() != den.is_negative();
    let a = num.abs();
    let b = den.abs();

    let mut q = &a / &b;
    let r = &a % &b;
    if &r * 2u32 >= b {
        q += 1u32;
    }

    if negatif {
        -q
    } else {
        q
    }
}

/// x / y à `echelle` décimales (HALF_UP), résultat normalisé.
/// None si y vaut exactement zéro.
pub fn diviser_a_echelle(x: &BigDecimal, y: &BigDecimal, echelle: i64) -> Option<BigDecimal> {
    if y.is_zero() {
        return None;
    }

    // x = mx·10^-sx, y = my·10^-sy
    // x/y·10^echelle = mx·10^(sy + echelle - sx) / my
    let (mx, sx) = x.as_bigint_and_exponent();
    let (my, sy) = y.as_bigint_and_exponent();

    let k = sy + echelle - sx;
    let (num, den) = if k >= 0 {
        (mx * pow10(k as u32), my)
    } else {
        (mx, my * pow10((-k) as u32))
    };

    Some(BigDecimal::new(div_arrondi(&num, &den), echelle).normalized())
}

/// Arrondi HALF_UP à `echelle` décimales (aucun effet si déjà assez court).
pub fn arrondir(v: &BigDecimal, echelle: i64) -> BigDecimal {
    let (m, s) = v.as_bigint_and_exponent();
    if s <= echelle {
        return v.clone();
    }
    let q = div_arrondi(&m, &pow10((s - echelle) as u32));
    BigDecimal::new(q, echelle)
}

/// Découpage d’un décimal normalisé en texte brut (sans groupement).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parties {
    pub negatif: bool,
    pub entier: String,
    pub fraction: String,
}

pub fn parties(v: &BigDecimal) -> Parties {
    let (m, s) = v.normalized().as_bigint_and_exponent();

    if m.is_zero() {
        return Parties {
            negatif: false,
            entier: "0".to_string(),
            fraction: String::new(),
        };
    }

    let negatif = m.is_negative();
    let mut chiffres = m.abs().to_str_radix(10);

    if s <= 0 {
        chiffres.extend(std::iter::repeat('0').take((-s) as usize));
        return Parties {
            negatif,
            entier: chiffres,
            fraction: String::new(),
        };
    }

    let s = s as usize;
    while chiffres.len() <= s {
        chiffres.insert(0, '0');
    }
    let coupe = chiffres.len() - s;

    Parties {
        negatif,
        entier: chiffres[..coupe].to_string(),
        fraction: chiffres[coupe..].to_string(),
    }
}

/// Texte brut "−?entier(.fraction)?" avec '.' comme séparateur interne.
pub fn texte_brut(v: &BigDecimal) -> String {
    let p = parties(v);
    let mut out = String::new();
    if p.negatif {
        out.push('-');
    }
    out.push_str(&p.entier);
    if !p.fraction.is_empty() {
        out.push('.');
        out.push_str(&p.fraction);
    }
    out
}

/// Lit le tampon de saisie de l’éditeur ('.' interne, point final toléré).
pub fn lire_saisie(chiffres: &str) -> Option<BigDecimal> {
    let s = chiffres.strip_suffix('.').unwrap_or(chiffres);
    if s.is_empty() || s == "-" {
        return None;
    }
    BigDecimal::from_str(s).ok().map(|v| v.normalized())
}
