//! Tests scientifiques (campagne) : scénarios complets au clavier.
//!
//! But : valider la chaîne saisie -> formule -> évaluation -> affichage -> historique
//! telle qu’un utilisateur la vit, touche par touche.
//! - notation compacte des touches (voir `action`)
//! - réglages par défaut : '.' décimal, ',' milliers, 10 chiffres affichés
//! - stress borné (budget temps global)
//!
//! Notes :
//! - les divisions sont calculées à 100 décimales puis arrondies à l’affichage,
//!   donc "1÷3×3" s’affiche 1 alors que la valeur interne vaut 0.999…9
//! - la factorielle n’accepte que les entiers de 0 à 3000

use std::time::{Duration, Instant};

use super::editeur::Action;
use super::historique::HistoriqueMemoire;
use super::jetons::{Constante, Operateur};
use super::reglages::Reglages;
use super::session::Session;

/// Touches : chiffres, '.', + - * /, ( ), '!', 'p' (π), 'e', '<' (effacer),
/// 'C' (tout effacer), '=' (égal), 'R' (rappel). Les espaces sont ignorés.
fn action(c: char) -> Option<Action> {
    Some(match c {
        '0'..='9' => Action::Chiffre(c as u8 - b'0'),
        '.' => Action::Virgule,
        '+' => Action::Operateur(Operateur::Plus),
        '-' => Action::Operateur(Operateur::Moins),
        '*' => Action::Operateur(Operateur::Fois),
        '/' => Action::Operateur(Operateur::Divise),
        '!' => Action::Factorielle,
        '(' => Action::ParentheseGauche,
        ')' => Action::ParentheseDroite,
        'p' => Action::Constante(Constante::Pi),
        'e' => Action::Constante(Constante::E),
        '<' => Action::Effacer,
        'C' => Action::ToutEffacer,
        '=' => Action::Egal,
        'R' => Action::RappelDernier,
        ' ' => return None,
        _ => panic!("touche inconnue: {c:?}"),
    })
}

fn session() -> Session {
    Session::new(Box::new(HistoriqueMemoire::new()), Reglages::default())
}

fn taper(s: &mut Session, touches: &str) {
    for a in touches.chars().filter_map(action) {
        s.appliquer(a);
    }
}

/// Tape la séquence, renvoie (formule affichée, résultat affiché).
fn scenario(touches: &str) -> (String, String) {
    let mut s = session();
    taper(&mut s, touches);
    (s.formule_affichee(), s.resultat_affiche().to_string())
}

fn assert_resultat(touches: &str, attendu: &str) {
    let (formule, resultat) = scenario(touches);
    assert_eq!(resultat, attendu, "touches={touches:?} formule={formule:?}");
}

fn assert_formule(touches: &str, attendu: &str) {
    let (formule, _) = scenario(touches);
    assert_eq!(formule, attendu, "touches={touches:?}");
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Cas de référence ------------------------ */

#[test]
fn sci_cas_de_reference() {
    assert_resultat("2+3*4=", "14");
    assert_resultat("(2+3)*4=", "20");
    assert_resultat("6!=", "720");
    assert_resultat("8/4/2=", "1");
    assert_resultat("10-3-2=", "5");
    assert_resultat("2*-3=", "-6");
}

#[test]
fn sci_erreurs_courtes() {
    assert_resultat("5/0=", "Division par zéro");
    assert_resultat("=", "Formule manquante");
    assert_resultat("()=", "Formule manquante");
    assert_resultat("2.5!=", "Expression invalide");
}

/* ------------------------ Précision décimale ------------------------ */

#[test]
fn sci_division_arrondie_a_l_affichage() {
    assert_resultat("1/3=", "0.3333333333");
    assert_resultat("2/3=", "0.6666666667");
    assert_resultat("1/3*3=", "1");
    assert_resultat("1/8=", "0.125");
}

#[test]
fn sci_decimaux_exacts() {
    assert_resultat(".1+.2=", "0.3");
    assert_resultat("1.5*1.5=", "2.25");
    assert_resultat("100-99.99=", "0.01");
}

#[test]
fn sci_constantes() {
    assert_resultat("p=", "3.1415926536");
    assert_resultat("e=", "2.7182818285");
    assert_resultat("2p=", "6.2831853072");
    assert_resultat("p-p=", "0");
    assert_formule("2pe", "2×π×e");
}

#[test]
fn sci_grands_nombres_groupes() {
    assert_resultat("999999*999999=", "999,998,000,001");
    assert_resultat("20!=", "2,432,902,008,176,640,000");
    assert_formule("1234567", "1,234,567");
}

/* ------------------------ Saisie ------------------------ */

#[test]
fn sci_parentheses_refermees_par_egal() {
    let mut s = session();
    taper(&mut s, "2*(3+4");
    assert_eq!(s.editeur().parentheses_ouvertes(), 1);
    taper(&mut s, "=");
    assert_eq!(s.resultat_affiche(), "14");
    assert_eq!(s.formule_affichee(), "2×(3+4)");
}

#[test]
fn sci_multiplications_implicites_evaluees() {
    assert_resultat("(2)(3)=", "6");
    assert_resultat("3!2=", "12");
    assert_resultat("2(3+1)=", "8");
}

#[test]
fn sci_remplacement_d_operateur() {
    assert_resultat("5+*2=", "10");
    assert_resultat("5*-2=", "-10");
    assert_resultat("5*-+2=", "10");
}

#[test]
fn sci_effacer_puis_corriger() {
    assert_resultat("12+34<5=", "47");
    assert_resultat("9*<+1=", "10");
    assert_resultat("(2+3)<)*2=", "10");
}

#[test]
fn sci_enchainement_apres_resultat() {
    assert_resultat("2+3=*2=", "10");
    assert_resultat("2+3=7=", "7");
    assert_resultat("1/0=+1=", "Division par zéro");
}

/* ------------------------ Historique / rappel ------------------------ */

#[test]
fn sci_historique_suit_les_succes() {
    let mut s = session();
    taper(&mut s, "1+1= 5/0= 2*2=");
    let h = s.historique();
    assert_eq!(h.len(), 2);
    assert_eq!(s.formateur().rendre(h[0].formule()), "1+1");
    assert_eq!(s.formateur().rendre(h[1].formule()), "2×2");
}

#[test]
fn sci_rappel_bascule() {
    let mut s = session();
    taper(&mut s, "1+1= 2*3=");

    taper(&mut s, "R");
    assert_eq!(s.formule_affichee(), "1+1");
    assert_eq!(s.resultat_affiche(), "2");

    taper(&mut s, "R");
    assert_eq!(s.formule_affichee(), "2×3");
    assert_eq!(s.resultat_affiche(), "6");

    assert_eq!(s.historique().len(), 4);
}

#[test]
fn sci_rappel_apres_tout_effacer() {
    let mut s = session();
    taper(&mut s, "7*6= C R");
    assert_eq!(s.formule_affichee(), "7×6");
    assert_eq!(s.resultat_affiche(), "42");
}

/* ------------------------ Réglages ------------------------ */

#[test]
fn sci_separateurs_europeens() {
    let mut s = Session::new(
        Box::new(HistoriqueMemoire::new()),
        Reglages::default().avec_separateur_decimal(','),
    );
    taper(&mut s, "1234.5*2");
    assert_eq!(s.formule_affichee(), "1.234,5×2");
    taper(&mut s, "=");
    assert_eq!(s.resultat_affiche(), "2.469");
}

#[test]
fn sci_chiffres_affiches() {
    let mut s = Session::new(
        Box::new(HistoriqueMemoire::new()),
        Reglages::default().avec_chiffres_affiches(3),
    );
    taper(&mut s, "2/3=");
    assert_eq!(s.resultat_affiche(), "0.667");
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_parentheses_profondes() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // 60 niveaux : "((((…1+1…" refermés par égal
    let mut touches = "(".repeat(60);
    touches.push_str("1+1=");
    budget(t0, max);

    assert_resultat(&touches, "2");
    budget(t0, max);
}

#[test]
fn sci_stress_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let mut touches = String::new();
    for k in 0..200 {
        if k > 0 {
            touches.push('+');
        }
        touches.push_str(".5");
    }
    touches.push('=');

    assert_resultat(&touches, "100");
    budget(t0, max);
}

#[test]
fn sci_stress_grande_factorielle() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let (_, r) = scenario("3000!=");
    assert!(r.len() > 9000, "3000! trop court: {} caractères", r.len());
    budget(t0, max);

    assert_resultat("3001!=", "Expression invalide");
}
