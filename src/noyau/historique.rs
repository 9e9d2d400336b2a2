//! Historique des calculs : journal en ajout seul, le plus récent en dernier.
//!
//! Deux dépôts :
//! - `HistoriqueMemoire` : tests, wasm
//! - `HistoriqueFichier` : document JSON versionné, relu puis réécrit à chaque ajout
//!   (fichier temporaire puis renommage)
//!
//! Un dépôt absent ou illisible se lit comme un historique vide (jamais d’erreur
//! remontée à l’appelant) ; les échecs d’écriture sont journalisés puis ignorés.
//! Un fichier présent mais illisible n’est jamais réécrit : l’ajout est abandonné.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::decimal::texte_brut;
use super::jetons::{Constante, Formule, Jeton, Operateur, Separateur};

/// Version du document écrit sur disque.
pub const VERSION_FORMAT: u32 = 1;

/// Un calcul réussi : copie de la formule + résultat. Immuable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculHistorique {
    formule: Formule,
    resultat: BigDecimal,
}

impl CalculHistorique {
    pub fn new(formule: &[Jeton], resultat: BigDecimal) -> Self {
        Self {
            formule: formule.to_vec(),
            resultat,
        }
    }

    pub fn formule(&self) -> &[Jeton] {
        &self.formule
    }

    pub fn resultat(&self) -> &BigDecimal {
        &self.resultat
    }
}

/// Frontière de persistance.
pub trait DepotHistorique {
    /// Ajoute en fin de journal (pas de dédoublonnage).
    fn ajouter(&mut self, calcul: CalculHistorique);

    /// Journal complet, du plus ancien au plus récent.
    fn lire_tout(&self) -> Vec<CalculHistorique>;
}

/* ------------------------ Mémoire ------------------------ */

#[derive(Clone, Debug, Default)]
pub struct HistoriqueMemoire {
    calculs: Vec<CalculHistorique>,
}

impl HistoriqueMemoire {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DepotHistorique for HistoriqueMemoire {
    fn ajouter(&mut self, calcul: CalculHistorique) {
        self.calculs.push(calcul);
    }

    fn lire_tout(&self) -> Vec<CalculHistorique> {
        self.calculs.clone()
    }
}

/* ------------------------ Fichier ------------------------ */

#[derive(Debug, Error)]
pub enum ErreurHistorique {
    #[error("E/S historique: {0}")]
    Io(#[from] io::Error),

    #[error("JSON historique: {0}")]
    Json(#[from] serde_json::Error),

    #[error("version d’historique non prise en charge: {0}")]
    Version(u32),

    #[error("décimal illisible dans l’historique: {0:?}")]
    Decimal(String),
}

#[derive(Clone, Debug)]
pub struct HistoriqueFichier {
    chemin: PathBuf,
}

impl HistoriqueFichier {
    pub fn new(chemin: impl Into<PathBuf>) -> Self {
        Self {
            chemin: chemin.into(),
        }
    }

    pub fn chemin(&self) -> &Path {
        &self.chemin
    }

    /// Lecture stricte (erreurs typées) ; `lire_tout` en est la version tolérante.
    pub fn lire(&self) -> Result<Vec<CalculHistorique>, ErreurHistorique> {
        let texte = fs::read_to_string(&self.chemin)?;
        decoder(&texte)
    }

    /// Écriture complète du journal (dossier parent créé au besoin).
    /// Temporaire puis renommage : un arrêt brutal laisse l’ancien fichier intact.
    pub fn ecrire(&self, calculs: &[CalculHistorique]) -> Result<(), ErreurHistorique> {
        if let Some(parent) = self.chemin.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let texte = encoder(calculs)?;
        let temporaire = self.chemin.with_extension("json.tmp");

        let mut f = File::create(&temporaire)?;
        f.write_all(texte.as_bytes())?;
        f.sync_all()?;
        drop(f);

        fs::rename(&temporaire, &self.chemin)?;
        Ok(())
    }
}

impl DepotHistorique for HistoriqueFichier {
    fn ajouter(&mut self, calcul: CalculHistorique) {
        // lecture stricte : seul un fichier absent vaut journal vide
        let mut calculs = match self.lire() {
            Ok(calculs) => calculs,
            Err(ErreurHistorique::Io(e)) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(chemin = %self.chemin.display(), erreur = %e, "historique illisible, ajout abandonné");
                return;
            }
        };
        calculs.push(calcul);
        match self.ecrire(&calculs) {
            Ok(()) => debug!(chemin = %self.chemin.display(), total = calculs.len(), "historique écrit"),
            Err(e) => warn!(chemin = %self.chemin.display(), erreur = %e, "écriture de l’historique impossible"),
        }
    }

    fn lire_tout(&self) -> Vec<CalculHistorique> {
        match self.lire() {
            Ok(calculs) => calculs,
            // premier lancement : rien à lire, rien à signaler
            Err(ErreurHistorique::Io(e)) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(chemin = %self.chemin.display(), erreur = %e, "historique illisible, ignoré");
                Vec::new()
            }
        }
    }
}

/* ------------------------ Encodage versionné ------------------------ */

// Forme disque découplée des types mémoire : étiquette + charge utile,
// décimaux en texte.

#[derive(Serialize, Deserialize)]
struct Document {
    version: u32,
    calculs: Vec<CalculEncode>,
}

#[derive(Serialize, Deserialize)]
struct CalculEncode {
    formule: Vec<JetonEncode>,
    resultat: String,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", content = "valeur", rename_all = "snake_case")]
enum JetonEncode {
    Nombre(String),
    Constante(Constante),
    Operateur(Operateur),
    Separateur(Separateur),
}

fn lire_decimal(s: &str) -> Result<BigDecimal, ErreurHistorique> {
    BigDecimal::from_str(s)
        .map(|v| v.normalized())
        .map_err(|_| ErreurHistorique::Decimal(s.to_string()))
}

fn encoder_jeton(j: &Jeton) -> JetonEncode {
    match j {
        Jeton::Nombre(v) => JetonEncode::Nombre(texte_brut(v)),
        Jeton::Constante(c) => JetonEncode::Constante(*c),
        Jeton::Operateur(o) => JetonEncode::Operateur(*o),
        Jeton::Separateur(s) => JetonEncode::Separateur(*s),
    }
}

fn decoder_jeton(j: JetonEncode) -> Result<Jeton, ErreurHistorique> {
    Ok(match j {
        JetonEncode::Nombre(s) => Jeton::Nombre(lire_decimal(&s)?),
        JetonEncode::Constante(c) => Jeton::Constante(c),
        JetonEncode::Operateur(o) => Jeton::Operateur(o),
        JetonEncode::Separateur(s) => Jeton::Separateur(s),
    })
}

pub fn encoder(calculs: &[CalculHistorique]) -> Result<String, ErreurHistorique> {
    let doc = Document {
        version: VERSION_FORMAT,
        calculs: calculs
            .iter()
            .map(|c| CalculEncode {
                formule: c.formule.iter().map(encoder_jeton).collect(),
                resultat: texte_brut(&c.resultat),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn decoder(texte: &str) -> Result<Vec<CalculHistorique>, ErreurHistorique> {
    let doc: Document = serde_json::from_str(texte)?;
    if doc.version != VERSION_FORMAT {
        return Err(ErreurHistorique::Version(doc.version));
    }

    doc.calculs
        .into_iter()
        .map(|c| {
            let formule = c
                .formule
                .into_iter()
                .map(decoder_jeton)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CalculHistorique {
                formule,
                resultat: lire_decimal(&c.resultat)?,
            })
        })
        .collect()
}
