use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc;

use clap::Parser;
use num_complex::Complex64;

mod color;
mod fractal;
mod io;
mod render;

use color::Rgb;
use fractal::defaults::MAX_ROOT_COUNT;
use fractal::{Limits, Parameters, Point, Root, RootSet, Threading};
use io::{png, settings};
use render::{RenderEvent, Renderer};

/// Utilitaire CLI pour générer des fractales de Newton.
///
/// Exemple d'utilisation :
///   fracton-cli --degree 5 --width 800 --height 800 --output newton.png
#[derive(Parser, Debug)]
#[command(
    name = "fracton-cli",
    about = "Générateur de fractales de Newton (méthode de Newton amortie) en ligne de commande",
    version,
    author = "Arnaud Verhille et contributeurs"
)]
struct Cli {
    /// Fichier de réglages JSON servant de base (les options de la ligne
    /// de commande restent prioritaires)
    #[arg(long, value_name = "FICHIER")]
    settings: Option<PathBuf>,

    /// Enregistre les réglages effectifs dans ce fichier avant le rendu
    #[arg(long, value_name = "FICHIER")]
    save_settings: Option<PathBuf>,

    /// Largeur de l'image de sortie en pixels
    #[arg(long)]
    width: Option<u32>,

    /// Hauteur de l'image de sortie en pixels
    #[arg(long)]
    height: Option<u32>,

    /// Degré du polynôme : racines équidistantes sur le cercle unité (1 à 10)
    #[arg(long)]
    degree: Option<usize>,

    /// Racine explicite du polynôme, répétable (prioritaire sur --degree)
    #[arg(long = "root", value_name = "RE,IM", allow_hyphen_values = true)]
    roots: Vec<String>,

    /// Bornes de la fenêtre du plan complexe
    #[arg(long, value_name = "GAUCHE,DROITE,HAUT,BAS", allow_hyphen_values = true)]
    window: Option<String>,

    /// Facteur d'amortissement complexe de l'itération
    #[arg(long, value_name = "RE,IM", allow_hyphen_values = true)]
    damping: Option<String>,

    /// Plafond d'itérations de Newton par pixel
    #[arg(long)]
    iterations: Option<u16>,

    /// Répartition du calcul (single, multi)
    #[arg(long)]
    threading: Option<String>,

    /// Rendu en taille réduite pour un aperçu rapide
    #[arg(long)]
    scale_down: bool,

    /// Passe de benchmark : taille agrandie, progression et chronométrage
    #[arg(long)]
    benchmark: bool,

    /// Facteur d'agrandissement du benchmark
    #[arg(long)]
    scale_up: Option<u32>,

    /// Trace l'orbite de Newton depuis ce pixel et l'affiche
    #[arg(long, value_name = "X,Y", allow_hyphen_values = true)]
    orbit: Option<String>,

    /// Fichier de sortie PNG
    #[arg(long, value_name = "FICHIER")]
    output: Option<PathBuf>,
}

/// Découpe une paire "gauche<sep>droite" et convertit les deux moitiés.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_window(s: &str) -> Option<(f64, f64, f64, f64)> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|part| part.trim().parse().ok())
        .collect::<Option<Vec<f64>>>()?;
    if parts.len() != 4 {
        return None;
    }
    Some((parts[0], parts[1], parts[2], parts[3]))
}

/// Construit l'instantané de paramètres : le fichier de réglages éventuel
/// sert de base (sinon les valeurs par défaut du moteur en taille
/// d'écran), puis chaque option de la ligne de commande s'applique
/// par-dessus.
fn build_params(cli: &Cli) -> Result<Parameters, String> {
    let mut params = match &cli.settings {
        Some(path) => settings::load(path)
            .map_err(|e| format!("Réglages illisibles ({}): {}", path.display(), e))?,
        None => {
            let mut params = Parameters::default();
            params.width = 1920;
            params.height = 1080;
            params
        }
    };

    // Taille de sortie.
    if let Some(width) = cli.width {
        params.width = width;
    }
    if let Some(height) = cli.height {
        params.height = height;
    }

    // Racines : explicites, sinon équidistantes selon le degré.
    if !cli.roots.is_empty() {
        let mut set = RootSet::new();
        for (i, raw) in cli.roots.iter().enumerate() {
            let Some((re, im)) = parse_pair::<f64>(raw, ',') else {
                return Err(format!("Racine invalide: '{}' (attendu RE,IM)", raw));
            };
            if !set.push(Root::new(Complex64::new(re, im), Rgb::predefined(i))) {
                return Err(format!("Trop de racines: {} au maximum", MAX_ROOT_COUNT));
            }
        }
        params.roots = set;
    } else if let Some(degree) = cli.degree {
        if !(1..=MAX_ROOT_COUNT).contains(&degree) {
            return Err(format!(
                "Degré invalide: {} (attendu entre 1 et {})",
                degree, MAX_ROOT_COUNT
            ));
        }
        params.roots = RootSet::equidistant(degree);
    }
    // Un fichier de réglages peut porter un ensemble de racines vide ;
    // le moteur n'émet aucun événement pour un tel instantané.
    if params.roots.is_empty() {
        return Err("Aucune racine: fournir --root, --degree ou des réglages en contenant".into());
    }

    // Fenêtre du plan.
    if let Some(window) = &cli.window {
        let Some((left, right, top, bottom)) = parse_window(window) else {
            return Err(format!(
                "Fenêtre invalide: '{}' (attendu GAUCHE,DROITE,HAUT,BAS)",
                window
            ));
        };
        if right <= left || top <= bottom {
            return Err("Fenêtre invalide: bornes dégénérées".into());
        }
        params.limits = Limits::from_bounds(left, right, top, bottom);
    }

    // Amortissement.
    if let Some(damping) = &cli.damping {
        let Some((re, im)) = parse_pair::<f64>(damping, ',') else {
            return Err(format!("Amortissement invalide: '{}' (attendu RE,IM)", damping));
        };
        params.damping = Complex64::new(re, im);
    }

    // Plafond d'itérations.
    if let Some(iterations) = cli.iterations {
        if iterations > 0 {
            params.max_iterations = iterations;
        }
    }

    // Threading.
    if let Some(mode) = &cli.threading {
        match Threading::from_cli_name(mode) {
            Some(threading) => params.threading = threading,
            None => {
                return Err(format!(
                    "Mode de threading invalide: '{}'. Options: single, multi",
                    mode
                ));
            }
        }
    }

    // Échelles et benchmark.
    if cli.scale_down {
        params.scale_down = true;
    }
    if let Some(scale_up) = cli.scale_up {
        if scale_up > 0 {
            params.scale_up_factor = scale_up;
        }
    }
    params.benchmark = cli.benchmark;

    // Orbite.
    if let Some(orbit) = &cli.orbit {
        let Some((x, y)) = parse_pair::<i32>(orbit, ',') else {
            return Err(format!("Point d'orbite invalide: '{}' (attendu X,Y)", orbit));
        };
        params.orbit_mode = true;
        params.orbit_start = Point::new(x, y);
    }

    Ok(params)
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let params = match build_params(&cli) {
        Ok(params) => params,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };

    if let Some(path) = &cli.save_settings {
        if let Err(e) = settings::save(&params, path) {
            eprintln!("Écriture des réglages impossible ({}): {}", path.display(), e);
            std::process::exit(1);
        }
    }

    if cli.output.is_none() && !params.benchmark {
        eprintln!("--output est requis hors benchmark");
        std::process::exit(1);
    }

    let wants_orbit = params.orbit_mode && !params.benchmark;

    let (events_tx, events) = mpsc::channel();
    let renderer = Renderer::new(events_tx);
    renderer.render(params);

    // Une seule passe : on attend le raster (ou la fin du benchmark) et
    // l'orbite éventuelle, dans n'importe quel ordre.
    let mut raster_done = false;
    let mut orbit_done = !wants_orbit;
    while !(raster_done && orbit_done) {
        match events.recv() {
            Ok(RenderEvent::FractalRendered { raster, fps }) => {
                println!(
                    "Raster {}x{} rendu ({:.1} images/s)",
                    raster.width(),
                    raster.height(),
                    fps
                );
                if let Some(output) = &cli.output {
                    if let Err(e) = png::save_png(&raster, output) {
                        eprintln!("Erreur lors de l'écriture du PNG: {e}");
                        std::process::exit(1);
                    }
                    println!("Image enregistrée dans {}", output.display());
                }
                raster_done = true;
            }
            Ok(RenderEvent::OrbitRendered { points }) => {
                if wants_orbit {
                    println!("Orbite de {} point(s):", points.len());
                    for point in &points {
                        println!("  ({}, {})", point.x, point.y);
                    }
                    orbit_done = true;
                }
            }
            Ok(RenderEvent::BenchmarkProgress { max, value, .. }) => {
                print!("\rBenchmark: ligne {}/{}", value, max);
                let _ = std::io::Write::flush(&mut std::io::stdout());
            }
            Ok(RenderEvent::BenchmarkFinished { raster, elapsed_ms }) => {
                println!();
                match raster {
                    Some(raster) => {
                        println!(
                            "Benchmark terminé en {} ms ({}x{})",
                            elapsed_ms,
                            raster.width(),
                            raster.height()
                        );
                        if let Some(output) = &cli.output {
                            if let Err(e) = png::save_png(&raster, output) {
                                eprintln!("Erreur lors de l'écriture du PNG: {e}");
                                std::process::exit(1);
                            }
                            println!("Image enregistrée dans {}", output.display());
                        }
                    }
                    None => {
                        eprintln!("Benchmark refusé: taille effective au-delà de la limite");
                        std::process::exit(1);
                    }
                }
                raster_done = true;
            }
            Err(_) => break,
        }
    }
    drop(renderer);
}
