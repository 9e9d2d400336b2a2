//! Noyau — évaluation d’une formule de jetons
//!
//! Réduction par paliers, dans cet ordre, chaque palier étant épuisé avant le suivant :
//! factorielles -> parenthèses (récursif) -> × ÷ -> + − (gauche à droite)
//!
//! Chaque réduction construit une nouvelle suite (pas de retrait/insertion en place).
//! Volontairement naïf (rescan complet après chaque réduction) : les formules sont courtes.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive};
use tracing::trace;

use super::decimal::{diviser_a_echelle, pow10, ECHELLE_DIVISION};
use super::erreur::ErreurCalcul;
use super::jetons::{decrire_jetons, Jeton, Operateur, Separateur};

/// Garde-fou : au-delà, n! est refusé (anti-gel).
pub const FACTORIELLE_MAX: u64 = 3000;

/// API publique : réduit une formule à une seule valeur décimale.
pub fn evaluer(formule: &[Jeton]) -> Result<BigDecimal, ErreurCalcul> {
    if formule.is_empty() {
        return Err(ErreurCalcul::FormuleManquante);
    }

    let mut jetons: Vec<Jeton> = formule.to_vec();

    // 1) Factorielles
    while let Some(i) = jetons
        .iter()
        .position(|j| matches!(j, Jeton::Operateur(Operateur::Factorielle)))
    {
        let n = match i.checked_sub(1).map(|g| &jetons[g]) {
            Some(Jeton::Nombre(v)) => factorielle(v)?,
            _ => return Err(ErreurCalcul::ExpressionInvalide),
        };
        jetons = remplacer(&jetons, i - 1, i + 1, Jeton::nombre(n));
    }
    trace!(jetons = %decrire_jetons(&jetons), "après factorielles");

    // 2) Parenthèses (paire la plus intérieure d’abord)
    while let Some((g, d)) = paire_interieure(&jetons)? {
        let v = evaluer(&jetons[g + 1..d])?;
        jetons = remplacer(&jetons, g, d + 1, Jeton::nombre(v));
    }
    trace!(jetons = %decrire_jetons(&jetons), "après parenthèses");

    // 3) × ÷ (le plus à gauche d’abord)
    while let Some(i) = jetons
        .iter()
        .position(|j| matches!(j, Jeton::Operateur(op) if op.est_prioritaire()))
    {
        let (debut, fin, v) = reduire_prioritaire(&jetons, i)?;
        jetons = remplacer(&jetons, debut, fin, Jeton::nombre(v));
    }
    trace!(jetons = %decrire_jetons(&jetons), "après × ÷");

    // 4) + − linéaire
    reduction_lineaire(&jetons)
}

/// Opération binaire ; la factorielle n’en est pas une.
pub fn operation_binaire(
    op: Operateur,
    x: &BigDecimal,
    y: &BigDecimal,
) -> Result<BigDecimal, ErreurCalcul> {
    let v = match op {
        Operateur::Plus => x + y,
        Operateur::Moins => x - y,
        Operateur::Fois => x * y,
        Operateur::Divise => {
            diviser_a_echelle(x, y, ECHELLE_DIVISION).ok_or(ErreurCalcul::DivisionParZero)?
        }
        Operateur::Factorielle => return Err(ErreurCalcul::ExpressionInvalide),
    };
    Ok(v.normalized())
}

/// n! pour un entier n avec 0 <= n <= FACTORIELLE_MAX (0! = 1).
/// Non entier, négatif ou trop grand => ExpressionInvalide.
pub fn factorielle(v: &BigDecimal) -> Result<BigDecimal, ErreurCalcul> {
    let (m, s) = v.normalized().as_bigint_and_exponent();
    if s > 0 || m.is_negative() {
        return Err(ErreurCalcul::ExpressionInvalide);
    }

    let entier = m * pow10((-s) as u32);
    let n = entier
        .to_u64()
        .filter(|n| *n <= FACTORIELLE_MAX)
        .ok_or(ErreurCalcul::ExpressionInvalide)?;

    let mut acc = BigInt::one();
    for k in 2..=n {
        acc *= k;
    }
    Ok(BigDecimal::from(acc))
}

/* ------------------------ Paliers ------------------------ */

/// Remplace jetons[debut..fin] par un seul jeton (nouvelle suite).
fn remplacer(jetons: &[Jeton], debut: usize, fin: usize, par: Jeton) -> Vec<Jeton> {
    let mut out = Vec::with_capacity(jetons.len() + 1 - (fin - debut));
    out.extend_from_slice(&jetons[..debut]);
    out.push(par);
    out.extend_from_slice(&jetons[fin..]);
    out
}

/// Première parenthèse fermante, et la dernière ouvrante qui la précède.
/// Une parenthèse orpheline (d’un côté ou de l’autre) => ExpressionInvalide.
fn paire_interieure(jetons: &[Jeton]) -> Result<Option<(usize, usize)>, ErreurCalcul> {
    let est = |j: &Jeton, s: Separateur| matches!(j, Jeton::Separateur(x) if *x == s);

    let droite = jetons
        .iter()
        .position(|j| est(j, Separateur::ParentheseDroite));

    match droite {
        Some(d) => jetons[..d]
            .iter()
            .rposition(|j| est(j, Separateur::ParentheseGauche))
            .map(|g| Some((g, d)))
            .ok_or(ErreurCalcul::ExpressionInvalide),
        None if jetons
            .iter()
            .any(|j| est(j, Separateur::ParentheseGauche)) =>
        {
            Err(ErreurCalcul::ExpressionInvalide)
        }
        None => Ok(None),
    }
}

/// Fenêtre autour d’un × ou ÷ en position i :
/// - opérande gauche : le jeton juste avant
/// - opérande droit : le jeton suivant, ou "− valeur" (moins unaire absorbé)
///
/// Retourne (début, fin exclusive, valeur).
fn reduire_prioritaire(
    jetons: &[Jeton],
    i: usize,
) -> Result<(usize, usize, BigDecimal), ErreurCalcul> {
    let op = match &jetons[i] {
        Jeton::Operateur(op) => *op,
        _ => return Err(ErreurCalcul::ExpressionInvalide),
    };

    let gauche = i
        .checked_sub(1)
        .and_then(|g| jetons[g].valeur())
        .ok_or(ErreurCalcul::ExpressionInvalide)?;

    let (droite, fin) = match jetons.get(i + 1) {
        Some(Jeton::Operateur(Operateur::Moins)) => {
            let v = jetons
                .get(i + 2)
                .and_then(Jeton::valeur)
                .ok_or(ErreurCalcul::ExpressionInvalide)?;
            (-v, i + 3)
        }
        Some(j) => (j.valeur().ok_or(ErreurCalcul::ExpressionInvalide)?, i + 2),
        None => return Err(ErreurCalcul::ExpressionInvalide),
    };

    let v = operation_binaire(op, &gauche, &droite)?;
    Ok((i - 1, fin, v))
}

/// Dernier palier : valeurs, + et − seulement.
/// Un − en tête ou juste après un opérateur est un moins unaire.
fn reduction_lineaire(jetons: &[Jeton]) -> Result<BigDecimal, ErreurCalcul> {
    if !jetons.iter().any(Jeton::est_valeur) {
        return Err(ErreurCalcul::FormuleManquante);
    }

    let mut it = jetons.iter();
    let mut acc = lire_terme(&mut it)?;

    while let Some(j) = it.next() {
        let op = match j {
            Jeton::Operateur(op @ (Operateur::Plus | Operateur::Moins)) => *op,
            _ => return Err(ErreurCalcul::ExpressionInvalide),
        };
        let t = lire_terme(&mut it)?;
        acc = operation_binaire(op, &acc, &t)?;
    }

    Ok(acc.normalized())
}

fn lire_terme<'a>(it: &mut impl Iterator<Item = &'a Jeton>) -> Result<BigDecimal, ErreurCalcul> {
    match it.next() {
        Some(Jeton::Operateur(Operateur::Moins)) => it
            .next()
            .and_then(Jeton::valeur)
            .map(|v| -v)
            .ok_or(ErreurCalcul::ExpressionInvalide),
        Some(j) => j.valeur().ok_or(ErreurCalcul::ExpressionInvalide),
        None => Err(ErreurCalcul::ExpressionInvalide),
    }
}
