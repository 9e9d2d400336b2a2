// src/app.rs
//
// Calculatrice à jetons — module App (racine)
// -------------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Clavier physique (une fois par frame, ici seulement):
// - texte tapé : chiffres, . , + - * x / ( ) ! p e = r
// - Entrée = égal, Retour arrière = effacer, Échap = tout effacer

pub mod etat;
pub mod vue;

// Ré-export pratique : `use crate::app::AppCalc;`
pub use etat::AppCalc;

use eframe::egui;

use crate::noyau::Action;

impl AppCalc {
    fn lire_clavier(&mut self, ctx: &egui::Context) {
        let (texte, entree, retour, echap) = ctx.input(|i| {
            let texte: String = i
                .events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect();
            (
                texte,
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::Escape),
            )
        });

        for a in texte.chars().filter_map(etat::action_clavier) {
            self.appliquer(a);
        }
        if entree {
            self.appliquer(Action::Egal);
        }
        if retour {
            self.appliquer(Action::Effacer);
        }
        if echap {
            self.reset_total();
        }
    }
}

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.lire_clavier(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui); // méthode publique (dans vue.rs)
        });
    }
}
