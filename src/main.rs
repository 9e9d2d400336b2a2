// src/main.rs
//
// Calculatrice à jetons — point d’entrée NATIF + WEB (WASM)
// ---------------------------------------------------------
// But:
// - NATIF (Linux/Windows/macOS) : eframe::run_native + NativeOptions
//   journal tracing (RUST_LOG), historique JSON dans le dossier de données
// - WEB  (wasm32)              : eframe::WebRunner + WebOptions + <canvas>
//   historique en mémoire (perdu au rechargement)
//
// Côté WEB (WASM) : index.html doit contenir un canvas :
//   <canvas id="the_canvas_id"></canvas>

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

use eframe::egui;

mod app;
mod noyau;

use app::AppCalc;
use noyau::Reglages;

/// Titre unique (natif + web).
const TITRE_APP: &str = "Calculatrice à jetons";

/* ------------------------ Entrée NATIF (PC) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
const DOSSIER_DONNEES: &str = "calculatrice-jetons";

#[cfg(not(target_arch = "wasm32"))]
const FICHIER_HISTORIQUE: &str = "historique.json";

/// Journal : `RUST_LOG` si présent, sinon `info`.
#[cfg(not(target_arch = "wasm32"))]
fn installer_journal() {
    use tracing_subscriber::EnvFilter;

    let filtre = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filtre).init();
}

/// Dépôt d’historique natif : fichier si un dossier de données existe, sinon mémoire.
#[cfg(not(target_arch = "wasm32"))]
fn depot_historique() -> Box<dyn noyau::DepotHistorique> {
    match dirs::data_dir() {
        Some(d) => {
            let depot = noyau::HistoriqueFichier::new(d.join(DOSSIER_DONNEES).join(FICHIER_HISTORIQUE));
            tracing::info!(chemin = %depot.chemin().display(), "historique sur disque");
            Box::new(depot)
        }
        None => {
            tracing::warn!("aucun dossier de données, historique en mémoire");
            Box::new(noyau::HistoriqueMemoire::new())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    installer_journal();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([420.0, 680.0])
            .with_min_inner_size([360.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(|_cc| Ok(Box::new(AppCalc::new(depot_historique(), Reglages::default())))),
    )
}

/* ------------------------ Entrée WEB (WASM) ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // En wasm32, le démarrage réel passe par `start()` (wasm_bindgen).
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{noyau, AppCalc, Reglages, TITRE_APP};

    use wasm_bindgen::JsCast;
    use web_sys::{window, HtmlCanvasElement};

    /// ID du canvas attendu dans index.html.
    const CANVAS_ID: &str = "the_canvas_id";

    /// Point d’entrée automatique au chargement de la page.
    /// - Fixe le titre de l’onglet (document.title)
    /// - Récupère le <canvas id="the_canvas_id">
    /// - Démarre eframe WebRunner dessus
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
        // 1) window/document
        let w = window().ok_or_else(|| js_err("window() indisponible"))?;
        let d = w
            .document()
            .ok_or_else(|| js_err("document() indisponible"))?;

        d.set_title(TITRE_APP);

        // 2) element by id -> HtmlCanvasElement
        let el = d
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| js_err("canvas introuvable (id incorrect dans index.html)"))?;
        let canvas: HtmlCanvasElement = el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_err("l’élément trouvé n’est pas un <canvas>"))?;

        // 3) run web
        let web_options = eframe::WebOptions::default();

        eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|_cc| {
                    let depot = Box::new(noyau::HistoriqueMemoire::new());
                    Ok(Box::new(AppCalc::new(depot, Reglages::default())))
                }),
            )
            .await
    }

    fn js_err(msg: &str) -> wasm_bindgen::JsValue {
        wasm_bindgen::JsValue::from_str(msg)
    }
}
