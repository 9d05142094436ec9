use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use log::{debug, warn};
use rayon::prelude::*;

use crate::fractal::defaults::MAX_RASTER_DIM;
use crate::fractal::orbit::trace_orbit;
use crate::fractal::params::{Parameters, Threading};
use crate::render::messages::{Raster, RenderEvent};
use crate::render::scanline;

/// Phase de la boucle de contrôle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Aucune passe n'a encore eu lieu : le premier instantané soumis
    /// est toujours rendu, même identique aux valeurs par défaut.
    NeverRendered,
    Idle,
    Running,
}

struct State {
    current: Parameters,
    next: Option<Parameters>,
    phase: Phase,
    quit: bool,
}

struct Shared {
    state: Mutex<State>,
    wakeup: Condvar,
    stop_benchmark: AtomicBool,
}

impl Shared {
    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Moteur de rendu : une boucle de contrôle sur un thread dédié qui
/// absorbe les instantanés soumis, ne recalcule que ce qui a changé et
/// publie ses résultats sur le canal fourni à la construction.
///
/// Les soumissions ne bloquent jamais : pendant qu'une passe tourne,
/// seule la plus récente est conservée et les intermédiaires sont
/// écrasées. La destruction du moteur arrête la boucle et attend la
/// fin du thread.
pub struct Renderer {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Renderer {
    pub fn new(events: Sender<RenderEvent>) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                current: Parameters::default(),
                next: None,
                phase: Phase::NeverRendered,
                quit: false,
            }),
            wakeup: Condvar::new(),
            stop_benchmark: AtomicBool::new(false),
        });
        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::spawn(move || control_loop(&worker_shared, &events));
        Renderer {
            shared,
            worker: Some(worker),
        }
    }

    /// Soumet un instantané de paramètres. L'instantané est assaini
    /// avant d'être retenu ; un ensemble de racines vide est refusé.
    pub fn render(&self, mut params: Parameters) {
        params.sanitize();
        if params.roots.is_empty() {
            warn!("instantané sans racine, rendu ignoré");
            return;
        }
        {
            let mut state = self.shared.lock();
            state.next = Some(params);
        }
        self.shared.wakeup.notify_one();
    }

    /// Demande l'arrêt du benchmark en cours. Sans benchmark en vol,
    /// la demande est sans effet.
    pub fn stop_benchmark(&self) {
        self.shared.stop_benchmark.store(true, Ordering::Relaxed);
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        {
            let mut state = self.shared.lock();
            state.quit = true;
        }
        self.shared.wakeup.notify_one();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn control_loop(shared: &Shared, events: &Sender<RenderEvent>) {
    loop {
        let (params, params_changed, orbit_changed) = {
            let mut state = shared.lock();
            loop {
                if state.quit {
                    return;
                }
                if let Some(next) = state.next.take() {
                    let first = state.phase == Phase::NeverRendered;
                    let params_changed = first || next.params_changed(&state.current);
                    let orbit_changed = next.orbit_changed(&state.current);
                    if params_changed || orbit_changed {
                        state.current = next.clone();
                        state.phase = Phase::Running;
                        break (next, params_changed, orbit_changed);
                    }
                    state.phase = Phase::Idle;
                    continue;
                }
                if state.phase == Phase::Running {
                    state.phase = Phase::Idle;
                }
                state = shared.wakeup.wait(state).unwrap_or_else(|e| e.into_inner());
            }
        };
        render_pass(shared, events, &params, params_changed, orbit_changed);
    }
}

/// Une passe complète : raster et orbite en parallèle, chacun selon son
/// propre prédicat de changement. L'orbite n'est jamais tracée pendant
/// un benchmark.
fn render_pass(
    shared: &Shared,
    events: &Sender<RenderEvent>,
    params: &Parameters,
    params_changed: bool,
    orbit_changed: bool,
) {
    let wants_raster = params_changed;
    let wants_orbit = orbit_changed && !params.benchmark;
    let raster_events = events.clone();
    let orbit_events = events.clone();
    rayon::join(
        move || {
            if !wants_raster {
                return;
            }
            if params.benchmark {
                render_benchmark(shared, &raster_events, params);
            } else {
                render_interactive(&raster_events, params);
            }
        },
        move || {
            if !wants_orbit {
                return;
            }
            let points = trace_orbit(params);
            let _ = orbit_events.send(RenderEvent::OrbitRendered { points });
        },
    );
}

/// Taille effective du raster : taille de sortie multipliée par le
/// facteur d'agrandissement en benchmark, sinon par le facteur de
/// réduction si l'aperçu est demandé. Chaque dimension est arrondie
/// puis bornée à 2 au minimum.
fn effective_size(params: &Parameters) -> (u32, u32) {
    let factor = if params.benchmark {
        params.scale_up_factor as f64
    } else if params.scale_down {
        params.scale_down_factor
    } else {
        1.0
    };
    let width = (params.width as f64 * factor).round().max(2.0) as u32;
    let height = (params.height as f64 * factor).round().max(2.0) as u32;
    (width, height)
}

fn render_interactive(events: &Sender<RenderEvent>, params: &Parameters) {
    let (width, height) = effective_size(params);
    debug!("rendu {}x{}, {} itérations max", width, height, params.max_iterations);
    let mut scaled = params.clone();
    scaled.width = width;
    scaled.height = height;
    let started = Instant::now();
    let mut raster = Raster::new(width, height);
    let row_len = raster.row_len();
    match params.threading {
        Threading::Multi => {
            raster
                .bytes_mut()
                .par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| scanline::render_row(&scaled, y as u32, row));
        }
        Threading::Single => {
            for (y, row) in raster.bytes_mut().chunks_mut(row_len).enumerate() {
                scanline::render_row(&scaled, y as u32, row);
            }
        }
    }
    let elapsed_ms = started.elapsed().as_millis().max(1);
    let fps = 1000.0 / elapsed_ms as f64;
    let _ = events.send(RenderEvent::FractalRendered { raster, fps });
}

/// Passe de benchmark : taille agrandie, progression ligne à ligne et
/// arrêt coopératif. Un benchmark arrêté n'émet pas de fin ; une taille
/// effective au-delà de [`MAX_RASTER_DIM`] est refusée sans allocation.
fn render_benchmark(shared: &Shared, events: &Sender<RenderEvent>, params: &Parameters) {
    shared.stop_benchmark.store(false, Ordering::Relaxed);
    let (width, height) = effective_size(params);
    if width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
        warn!("benchmark {}x{} refusé, dimension au-delà de {}", width, height, MAX_RASTER_DIM);
        let _ = events.send(RenderEvent::BenchmarkFinished {
            raster: None,
            elapsed_ms: 0,
        });
        return;
    }
    debug!("benchmark {}x{}", width, height);
    let mut scaled = params.clone();
    scaled.width = width;
    scaled.height = height;
    let started = Instant::now();
    let mut raster = Raster::new(width, height);
    let row_len = raster.row_len();
    let progress = AtomicU32::new(0);
    match params.threading {
        Threading::Multi => {
            raster
                .bytes_mut()
                .par_chunks_mut(row_len)
                .enumerate()
                .for_each_with(events.clone(), |sender, (y, row)| {
                    if shared.stop_benchmark.load(Ordering::Relaxed) {
                        return;
                    }
                    scanline::render_row(&scaled, y as u32, row);
                    let value = progress.fetch_add(1, Ordering::Relaxed) + 1;
                    let _ = sender.send(RenderEvent::BenchmarkProgress {
                        min: 0,
                        max: height,
                        value,
                    });
                });
        }
        Threading::Single => {
            for (y, row) in raster.bytes_mut().chunks_mut(row_len).enumerate() {
                if shared.stop_benchmark.load(Ordering::Relaxed) {
                    break;
                }
                scanline::render_row(&scaled, y as u32, row);
                let value = progress.fetch_add(1, Ordering::Relaxed) + 1;
                let _ = events.send(RenderEvent::BenchmarkProgress {
                    min: 0,
                    max: height,
                    value,
                });
            }
        }
    }
    if shared.stop_benchmark.load(Ordering::Relaxed) {
        debug!("benchmark interrompu");
        return;
    }
    let elapsed_ms = started.elapsed().as_millis();
    let _ = events.send(RenderEvent::BenchmarkFinished {
        raster: Some(raster),
        elapsed_ms,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::params::Point;
    use crate::fractal::roots::RootSet;
    use num_complex::Complex64;
    use std::sync::mpsc::{channel, Receiver, TryRecvError};
    use std::time::Duration;

    fn small_params() -> Parameters {
        let mut params = Parameters::default();
        params.roots = RootSet::equidistant(3);
        params.width = 31;
        params.height = 17;
        params
    }

    fn recv_raster(events: &Receiver<RenderEvent>) -> Raster {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match events.recv_timeout(remaining) {
                Ok(RenderEvent::FractalRendered { raster, .. }) => return raster,
                Ok(_) => continue,
                Err(e) => panic!("pas de raster : {:?}", e),
            }
        }
    }

    #[test]
    fn test_effective_size_factors() {
        let mut params = small_params();
        assert_eq!(effective_size(&params), (31, 17));
        params.scale_down = true;
        params.scale_down_factor = 0.5;
        assert_eq!(effective_size(&params), (16, 9));
        params.benchmark = true;
        params.scale_up_factor = 3;
        assert_eq!(effective_size(&params), (93, 51));
    }

    #[test]
    fn test_effective_size_clamps_to_two() {
        let mut params = small_params();
        params.width = 2;
        params.height = 2;
        params.scale_down = true;
        params.scale_down_factor = 0.1;
        assert_eq!(effective_size(&params), (2, 2));
    }

    #[test]
    fn test_first_render_emits_raster() {
        let (tx, rx) = channel();
        let renderer = Renderer::new(tx);
        renderer.render(small_params());
        let raster = recv_raster(&rx);
        assert_eq!(raster.width(), 31);
        assert_eq!(raster.height(), 17);
        drop(renderer);
    }

    #[test]
    fn test_unchanged_snapshot_is_absorbed() {
        let (tx, rx) = channel();
        let renderer = Renderer::new(tx);
        let params = small_params();
        renderer.render(params.clone());
        let _ = recv_raster(&rx);
        renderer.render(params);
        std::thread::sleep(Duration::from_millis(200));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        drop(renderer);
    }

    #[test]
    fn test_empty_roots_are_rejected() {
        let (tx, rx) = channel();
        let renderer = Renderer::new(tx);
        let mut params = small_params();
        params.roots = RootSet::new();
        renderer.render(params);
        std::thread::sleep(Duration::from_millis(200));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        drop(renderer);
    }

    #[test]
    fn test_burst_of_snapshots_coalesces() {
        let (tx, rx) = channel();
        let renderer = Renderer::new(tx);
        // première passe lente : amortissement faible, convergence longue
        let mut slow = small_params();
        slow.width = 160;
        slow.height = 160;
        slow.damping = Complex64::new(0.1, 0.0);
        renderer.render(slow.clone());
        std::thread::sleep(Duration::from_millis(30));
        // deux soumissions pendant la passe : seule la dernière survit
        let mut overwritten = slow.clone();
        overwritten.width = 64;
        overwritten.height = 64;
        renderer.render(overwritten);
        let mut last = slow.clone();
        last.width = 31;
        last.height = 17;
        renderer.render(last);
        let first = recv_raster(&rx);
        assert_eq!(first.width(), 160);
        let second = recv_raster(&rx);
        assert_eq!((second.width(), second.height()), (31, 17));
        std::thread::sleep(Duration::from_millis(200));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        drop(renderer);
    }

    #[test]
    fn test_scale_down_and_single_thread() {
        let (tx, rx) = channel();
        let renderer = Renderer::new(tx);
        let mut params = small_params();
        params.width = 64;
        params.height = 64;
        params.scale_down = true;
        params.threading = Threading::Single;
        renderer.render(params);
        let raster = recv_raster(&rx);
        assert_eq!((raster.width(), raster.height()), (32, 32));
        drop(renderer);
    }

    #[test]
    fn test_orbit_rendered_alongside_raster() {
        let (tx, rx) = channel();
        let renderer = Renderer::new(tx);
        let mut params = small_params();
        params.orbit_mode = true;
        params.orbit_start = Point::new(0, 0);
        renderer.render(params);
        let mut got_raster = false;
        let mut orbit: Option<Vec<Point>> = None;
        for _ in 0..2 {
            match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
                RenderEvent::FractalRendered { .. } => got_raster = true,
                RenderEvent::OrbitRendered { points } => orbit = Some(points),
                _ => panic!("événement inattendu"),
            }
        }
        assert!(got_raster);
        let points = orbit.unwrap();
        assert!(!points.is_empty());
        assert_eq!(points[0], Point::new(0, 0));
        drop(renderer);
    }

    #[test]
    fn test_benchmark_reports_progress_then_finishes() {
        let (tx, rx) = channel();
        let renderer = Renderer::new(tx);
        let mut params = small_params();
        params.width = 16;
        params.height = 8;
        params.benchmark = true;
        renderer.render(params);
        let mut top_progress = 0;
        loop {
            match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
                RenderEvent::BenchmarkProgress { min, max, value } => {
                    assert_eq!(min, 0);
                    assert_eq!(max, 16);
                    top_progress = top_progress.max(value);
                }
                RenderEvent::BenchmarkFinished { raster, .. } => {
                    let raster = raster.unwrap();
                    assert_eq!((raster.width(), raster.height()), (32, 16));
                    break;
                }
                _ => panic!("événement inattendu"),
            }
        }
        assert_eq!(top_progress, 16);
        drop(renderer);
    }

    #[test]
    fn test_oversized_benchmark_fails_fast() {
        let (tx, rx) = channel();
        let renderer = Renderer::new(tx);
        let mut params = small_params();
        params.width = 20000;
        params.height = 10;
        params.benchmark = true;
        renderer.render(params);
        match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
            RenderEvent::BenchmarkFinished { raster, elapsed_ms } => {
                assert!(raster.is_none());
                assert_eq!(elapsed_ms, 0);
            }
            _ => panic!("événement inattendu"),
        }
        drop(renderer);
    }

    #[test]
    fn test_stop_without_benchmark_is_noop() {
        let (tx, rx) = channel();
        let renderer = Renderer::new(tx);
        renderer.stop_benchmark();
        renderer.render(small_params());
        let _ = recv_raster(&rx);
        // le drapeau d'arrêt est remis à zéro au départ du benchmark
        let mut params = small_params();
        params.width = 8;
        params.height = 4;
        params.benchmark = true;
        renderer.render(params);
        loop {
            match rx.recv_timeout(Duration::from_secs(10)).unwrap() {
                RenderEvent::BenchmarkFinished { raster, .. } => {
                    assert!(raster.is_some());
                    break;
                }
                RenderEvent::BenchmarkProgress { .. } => continue,
                _ => panic!("événement inattendu"),
            }
        }
        drop(renderer);
    }

    #[test]
    fn test_drop_while_rendering_joins_cleanly() {
        let (tx, _rx) = channel();
        let renderer = Renderer::new(tx);
        let mut slow = small_params();
        slow.width = 160;
        slow.height = 160;
        slow.damping = Complex64::new(0.1, 0.0);
        renderer.render(slow);
        std::thread::sleep(Duration::from_millis(20));
        // la passe en vol se termine avant la jonction du thread
        drop(renderer);
    }
}
