//! Tests fuzz safe : robustesse + déterminisme + propriétés de l’éditeur.
//!
//! But : marteler la saisie et l’évaluation sans brûler la machine.
//! - RNG déterministe (seed fixe) pour les campagnes de touches
//! - proptest pour les propriétés (séquences courtes)
//! - budget temps global
//! - invariant clé : une évaluation ne panique jamais, elle rend une valeur ou une erreur

use std::str::FromStr;
use std::time::{Duration, Instant};

use bigdecimal::BigDecimal;
use proptest::prelude::*;

use super::editeur::{Action, Editeur};
use super::erreur::ErreurCalcul;
use super::eval::evaluer;
use super::format::Formateur;
use super::historique::HistoriqueMemoire;
use super::jetons::{Constante, Jeton, Operateur, Separateur};
use super::reglages::Reglages;
use super::session::Session;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers ------------------------ */

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn session() -> Session {
    Session::new(Box::new(HistoriqueMemoire::new()), Reglages::default())
}

fn jouer(ed: &mut Editeur, a: Action) {
    match a {
        Action::Chiffre(c) => ed.saisir_chiffre(c),
        Action::Virgule => ed.saisir_virgule(),
        Action::Operateur(op) => ed.saisir_operateur(op),
        Action::Factorielle => ed.saisir_factorielle(),
        Action::Constante(c) => ed.saisir_constante(c),
        Action::ParentheseGauche => ed.parenthese_gauche(),
        Action::ParentheseDroite => ed.parenthese_droite(),
        Action::Effacer => ed.effacer(),
        Action::ToutEffacer => ed.tout_effacer(),
        Action::Egal => {
            ed.egal();
        }
        // sans historique, rien à rappeler
        Action::RappelDernier => {}
    }
}

/// Tirage d’une touche ; les chiffres dominent, comme au clavier.
fn tirer_action(rng: &mut Rng) -> Action {
    match rng.pick(20) {
        0..=7 => Action::Chiffre(rng.pick(10) as u8),
        8 => Action::Virgule,
        9 => Action::Operateur(Operateur::Plus),
        10 => Action::Operateur(Operateur::Moins),
        11 => Action::Operateur(Operateur::Fois),
        12 => Action::Operateur(Operateur::Divise),
        13 => Action::Factorielle,
        14 => Action::Constante(if rng.pick(2) == 0 { Constante::Pi } else { Constante::E }),
        15 => Action::ParentheseGauche,
        16 => Action::ParentheseDroite,
        17 => Action::Effacer,
        18 => Action::Egal,
        _ => Action::RappelDernier,
    }
}

fn est_erreur_attendue(e: ErreurCalcul) -> bool {
    // toutes les erreurs sont des issues normales pour une saisie aléatoire
    matches!(
        e,
        ErreurCalcul::DivisionParZero
            | ErreurCalcul::FormuleManquante
            | ErreurCalcul::ExpressionInvalide
    )
}

/* ------------------------ Campagnes déterministes ------------------------ */

#[test]
fn fuzz_safe_session_ne_panique_pas() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut s = session();

    let mut vus_ok = 0usize;
    let mut vus_err = 0usize;

    for _ in 0..3000 {
        budget(t0, max);

        let a = tirer_action(&mut rng);
        let avant = s.historique().len();
        s.appliquer(a);

        if a == Action::Egal {
            if s.historique().len() > avant {
                vus_ok += 1;
            } else {
                vus_err += 1;
            }
        }

        // les parenthèses ouvertes ne passent jamais sous zéro (usize) et
        // l’affichage reste calculable
        let _ = s.formule_affichee();
    }

    assert!(vus_ok > 10, "trop peu de succès: {vus_ok}");
    assert!(vus_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_determinisme() {
    let derouler = |seed: u64| {
        let mut rng = Rng::new(seed);
        let mut s = session();
        let mut traces = Vec::new();
        for _ in 0..400 {
            s.appliquer(tirer_action(&mut rng));
            traces.push((s.formule_affichee(), s.resultat_affiche().to_string()));
        }
        traces
    };

    assert_eq!(derouler(0xBADC0DE), derouler(0xBADC0DE));
}

#[test]
fn fuzz_safe_jetons_aleatoires() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    let mut rng = Rng::new(0x5EED_u64);

    for _ in 0..2000 {
        budget(t0, max);

        let n = 1 + rng.pick(12) as usize;
        let formule: Vec<Jeton> = (0..n)
            .map(|_| match rng.pick(11) {
                0..=3 => Jeton::nombre(BigDecimal::from(rng.pick(20))),
                4 => Jeton::Constante(Constante::Pi),
                5 => Jeton::Operateur(Operateur::Plus),
                6 => Jeton::Operateur(Operateur::Moins),
                7 => Jeton::Operateur(Operateur::Fois),
                8 => Jeton::Operateur(Operateur::Divise),
                9 => Jeton::Operateur(Operateur::Factorielle),
                _ => Jeton::Separateur(if rng.pick(2) == 0 {
                    Separateur::ParentheseGauche
                } else {
                    Separateur::ParentheseDroite
                }),
            })
            .collect();

        if let Err(e) = evaluer(&formule) {
            assert!(est_erreur_attendue(e), "erreur: {e:?}");
        }
    }
}

#[test]
fn fuzz_safe_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // 400 × "+0.5" : réduction linéaire, pas de récursion profonde
    let mut formule = vec![Jeton::nombre(dec("0.5"))];
    for _ in 1..400 {
        formule.push(Jeton::Operateur(Operateur::Plus));
        formule.push(Jeton::nombre(dec("0.5")));
    }

    assert_eq!(evaluer(&formule), Ok(dec("200")));
    budget(t0, max);
}

/* ------------------------ Propriétés ------------------------ */

fn arb_chiffre() -> impl Strategy<Value = Action> {
    (1u8..10).prop_map(Action::Chiffre)
}

fn arb_operateur() -> impl Strategy<Value = Operateur> {
    prop_oneof![
        Just(Operateur::Plus),
        Just(Operateur::Moins),
        Just(Operateur::Fois),
        Just(Operateur::Divise),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0u8..10).prop_map(Action::Chiffre),
        1 => Just(Action::Virgule),
        2 => arb_operateur().prop_map(Action::Operateur),
        1 => Just(Action::Factorielle),
        1 => Just(Action::Constante(Constante::Pi)),
        1 => Just(Action::Constante(Constante::E)),
        1 => Just(Action::ParentheseGauche),
        1 => Just(Action::ParentheseDroite),
        1 => Just(Action::Effacer),
        1 => Just(Action::Egal),
        1 => Just(Action::RappelDernier),
        1 => Just(Action::ToutEffacer),
    ]
}

/// Touches sans virgule ni égal : le cadre où Effacer défait exactement.
fn arb_prefixe() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => arb_chiffre(),
        2 => arb_operateur().prop_map(Action::Operateur),
        1 => Just(Action::Factorielle),
        1 => Just(Action::Constante(Constante::Pi)),
        1 => Just(Action::ParentheseGauche),
        1 => Just(Action::ParentheseDroite),
    ]
}

fn arb_touche_annulable() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => arb_chiffre(),
        1 => Just(Action::ParentheseGauche),
        1 => Just(Action::ParentheseDroite),
    ]
}

fn arb_terme() -> impl Strategy<Value = (bool, i64)> {
    (any::<bool>(), 0i64..1_000_000)
}

proptest! {
    #[test]
    fn prop_session_ne_panique_pas(actions in prop::collection::vec(arb_action(), 0..60)) {
        let mut s = session();
        for a in actions {
            let avant = s.historique().len();
            s.appliquer(a);
            prop_assert!(s.historique().len() >= avant);
        }
    }

    #[test]
    fn prop_un_seul_separateur_decimal(
        touches in prop::collection::vec(
            prop_oneof![
                4 => (0u8..10).prop_map(Action::Chiffre),
                2 => Just(Action::Virgule),
                1 => Just(Action::Effacer),
            ],
            0..30,
        )
    ) {
        let f = Formateur::default();
        let mut ed = Editeur::new();
        for a in touches {
            jouer(&mut ed, a);
            let texte = ed.affichage(&f);
            prop_assert!(texte.matches('.').count() <= 1, "affichage: {texte:?}");
        }
    }

    #[test]
    fn prop_exactement_une_virgule_affichee(
        avant in prop::collection::vec(0u8..10, 0..12),
        apres in prop::collection::vec(0u8..10, 0..12),
    ) {
        let f = Formateur::default();
        let mut ed = Editeur::new();
        for c in avant {
            ed.saisir_chiffre(c);
        }
        ed.saisir_virgule();
        for c in apres {
            ed.saisir_chiffre(c);
        }

        let texte = ed.affichage(&f);
        prop_assert_eq!(texte.matches('.').count(), 1, "affichage: {:?}", texte);
    }

    #[test]
    fn prop_effacer_defait_la_derniere_touche(
        prefixe in prop::collection::vec(arb_prefixe(), 0..20),
        derniere in arb_touche_annulable(),
    ) {
        let f = Formateur::default();
        let mut ed = Editeur::new();
        for a in prefixe {
            jouer(&mut ed, a);
        }

        let avant = ed.affichage(&f);
        jouer(&mut ed, derniere);
        let apres = ed.affichage(&f);

        // touche ignorée (ex. ')' sans ouvrante) : rien à défaire
        if apres != avant {
            ed.effacer();
            prop_assert_eq!(ed.affichage(&f), avant);
        }
    }

    #[test]
    fn prop_addition_soustraction_exactes(
        premier in 0i64..1_000_000,
        termes in prop::collection::vec(arb_terme(), 0..20),
    ) {
        // centièmes : aucune perte possible en + / −
        let centiemes = |n: i64| BigDecimal::new(n.into(), 2);

        let mut formule = vec![Jeton::nombre(centiemes(premier))];
        let mut attendu = centiemes(premier);
        for (plus, n) in termes {
            let op = if plus { Operateur::Plus } else { Operateur::Moins };
            formule.push(Jeton::Operateur(op));
            formule.push(Jeton::nombre(centiemes(n)));
            attendu = if plus { attendu + centiemes(n) } else { attendu - centiemes(n) };
        }

        prop_assert_eq!(evaluer(&formule), Ok(attendu));
    }

    #[test]
    fn prop_formatage_stable(n in any::<i64>(), echelle in 0i64..20, chiffres in 0usize..30) {
        let v = BigDecimal::new(n.into(), echelle);
        let f = Formateur::new(Reglages::default().avec_chiffres_affiches(chiffres));

        let a = f.formater_nombre(&v);
        prop_assert_eq!(&a, &f.formater_nombre(&v));

        // jamais plus de décimales que demandé, jamais de zéro final
        if let Some((_, fraction)) = a.split_once('.') {
            prop_assert!(fraction.len() <= chiffres);
            prop_assert!(!fraction.ends_with('0'));
        }
    }

    #[test]
    fn prop_historique_dernier_calcul(a in 1u8..10, b in 1u8..10, op in arb_operateur()) {
        let mut s = session();
        s.appliquer(Action::Chiffre(a));
        s.appliquer(Action::Operateur(op));
        s.appliquer(Action::Chiffre(b));
        s.appliquer(Action::Egal);

        let h = s.historique();
        let dernier = h.last().unwrap();
        let attendu = evaluer(dernier.formule()).unwrap();
        prop_assert_eq!(dernier.resultat(), &attendu);
        prop_assert_eq!(
            dernier.formule(),
            &[
                Jeton::nombre(BigDecimal::from(a)),
                Jeton::Operateur(op),
                Jeton::nombre(BigDecimal::from(b)),
            ][..]
        );
    }
}
