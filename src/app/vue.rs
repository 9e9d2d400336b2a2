// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Écran : formule en cours + résultat (ou message d’erreur court)
// - Tactile : gros boutons, une touche = une Action
// - Historique repliable (formule = résultat)
//
// Le clavier physique est traité dans app.rs (une seule fois par frame).

use eframe::egui;

use super::etat::AppCalc;
use crate::noyau::jetons::{Constante, Operateur};
use crate::noyau::reglages::CHIFFRES_AFFICHES_MAX;
use crate::noyau::Action;

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice à jetons");
                ui.add_space(6.0);

                self.ui_ecran(ui);

                ui.add_space(8.0);
                self.ui_reglages(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_pave(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_historique(ui);
            });
    }

    fn ui_ecran(&mut self, ui: &mut egui::Ui) {
        ui.label("Formule :");
        let formule = self.session.formule_affichee();
        Self::champ_monospace(ui, "formule_out", &formule, 2);

        ui.add_space(6.0);

        ui.label("Résultat :");
        let resultat = self.session.resultat_affiche().to_string();
        if self.session.editeur().dernier_resultat().is_none() && !resultat.is_empty() {
            // échec : message court, en couleur d’erreur
            ui.colored_label(ui.visuals().error_fg_color, resultat);
        } else {
            Self::champ_monospace(ui, "resultat_out", &resultat, 1);
        }
    }

    fn ui_reglages(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut virgule = self.reglages.separateur_decimal == ',';
            if ui
                .checkbox(&mut virgule, "Virgule décimale")
                .on_hover_text("1.234,5 au lieu de 1,234.5")
                .changed()
            {
                self.set_virgule_decimale(virgule);
            }

            ui.separator();

            ui.label("Affichage :");
            let mut d = self.reglages.chiffres_affiches as u32;
            let resp = ui.add(
                egui::DragValue::new(&mut d)
                    .speed(1)
                    .range(0..=CHIFFRES_AFFICHES_MAX as u32)
                    .suffix(" chiffres"),
            );
            if resp.changed() {
                self.set_chiffres(d as usize);
            }
        });
    }

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_calculatrice")
            .num_columns(5)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.bouton(ui, "C", "Tout effacer (Échap)", Action::ToutEffacer);
                self.bouton(ui, "DEL", "Efface le dernier symbole", Action::Effacer);
                self.bouton(ui, "(", "Parenthèse ouvrante", Action::ParentheseGauche);
                self.bouton(ui, ")", "Parenthèse fermante", Action::ParentheseDroite);
                self.bouton(ui, "R", "Rappel du calcul précédent", Action::RappelDernier);
                ui.end_row();

                self.chiffre(ui, 7);
                self.chiffre(ui, 8);
                self.chiffre(ui, 9);
                self.bouton(ui, "÷", "Diviser", Action::Operateur(Operateur::Divise));
                self.bouton(ui, "π", "Pi", Action::Constante(Constante::Pi));
                ui.end_row();

                self.chiffre(ui, 4);
                self.chiffre(ui, 5);
                self.chiffre(ui, 6);
                self.bouton(ui, "×", "Multiplier", Action::Operateur(Operateur::Fois));
                self.bouton(ui, "e", "Nombre d’Euler", Action::Constante(Constante::E));
                ui.end_row();

                self.chiffre(ui, 1);
                self.chiffre(ui, 2);
                self.chiffre(ui, 3);
                self.bouton(ui, "−", "Soustraire", Action::Operateur(Operateur::Moins));
                self.bouton(ui, "n!", "Factorielle", Action::Factorielle);
                ui.end_row();

                self.chiffre(ui, 0);
                let sep = self.reglages.separateur_decimal.to_string();
                self.bouton(ui, &sep, "Séparateur décimal", Action::Virgule);
                ui.label("");
                self.bouton(ui, "+", "Additionner", Action::Operateur(Operateur::Plus));
                self.bouton(ui, "=", "Calculer (Entrée)", Action::Egal);
                ui.end_row();
            });
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Historique")
            .default_open(false)
            .show(ui, |ui| {
                let calculs = self.session.historique();
                if calculs.is_empty() {
                    ui.monospace("vide");
                    return;
                }

                let f = self.session.formateur();
                // le plus récent en haut
                for c in calculs.iter().rev() {
                    ui.monospace(format!(
                        "{} = {}",
                        f.rendre(c.formule()),
                        f.formater_resultat(Some(c.resultat()))
                    ));
                }
            });
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn chiffre(&mut self, ui: &mut egui::Ui, c: u8) {
        let label = c.to_string();
        let resp = ui.add_sized([52.0, 36.0], egui::Button::new(label));
        if resp.clicked() {
            self.appliquer(Action::Chiffre(c));
        }
    }

    fn bouton(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([52.0, 36.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            self.appliquer(action);
        }
    }
}
