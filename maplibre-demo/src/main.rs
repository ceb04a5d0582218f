use std::{error::Error, fs, path::PathBuf, sync::Arc, thread, time::Duration};

use cgmath::Deg;
use clap::Parser;
use maplibre_labels::{
    coords::{WorldCoords, WorldTileCoords, ZoomLevel},
    geometry::LabelSegment,
    headless::{HeadlessEnvironment, RedrawCounter, SharedTileSource, SharedViewport},
    kernel::KernelBuilder,
    overlay::TextOverlay,
    settings::LabelSettings,
    tile::{LabelCandidate, LabelText, TileSnapshot, VisibleTile},
    view_state::ViewPose,
};

/// Pans and rotates a synthetic map and logs every text layer the labeling thread produces.
#[derive(Parser, Debug)]
#[command(name = "maplibre-labels-demo", version)]
struct Args {
    /// Number of simulated frames
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Tiles per side of the visible grid
    #[arg(long, default_value_t = 3)]
    tiles: i32,

    #[arg(long, default_value_t = 14)]
    zoom: u8,

    /// Pixels the camera moves per frame
    #[arg(long, default_value_t = 4.0)]
    pan: f64,

    /// Degrees the camera rotates per frame
    #[arg(long, default_value_t = 0.5)]
    rotate: f64,

    /// Overrides the debounce interval of the settings
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// JSON file with label settings
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[cfg(feature = "trace")]
fn enable_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, Registry};

    let subscriber = Registry::default().with(tracing_tracy::TracyLayer::new());

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn load_settings(args: &Args) -> Result<LabelSettings, Box<dyn Error>> {
    let mut settings = match &args.settings {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => LabelSettings::default(),
    };
    if let Some(millis) = args.debounce_ms {
        settings.debounce = Duration::from_millis(millis);
    }
    Ok(settings)
}

/// A square of tiles around `center`, each with a few captions and street names.
fn synthetic_tiles(center: WorldTileCoords, side: i32, tile_size: f32) -> TileSnapshot {
    let styles = [
        Arc::new(LabelText::new("Marienplatz", 14.0, [20, 20, 20, 255])),
        Arc::new(LabelText::new("Leopoldstraße", 11.0, [60, 60, 60, 255])),
        Arc::new(LabelText::new("Isar", 12.0, [40, 90, 200, 255])),
    ];

    let half = side / 2;
    let mut tiles = Vec::new();
    for y in -half..side - half {
        for x in -half..side - half {
            let coords = WorldTileCoords::from((center.x + x, center.y + y, center.z));
            let seed = (coords.x.wrapping_mul(31) ^ coords.y.wrapping_mul(17)).unsigned_abs();

            let mut labels = Vec::new();
            for i in 0..4u32 {
                let u = ((seed + i * 97) % 100) as f32 / 100.0 * tile_size;
                let v = ((seed + i * 53) % 100) as f32 / 100.0 * tile_size;
                let text = styles[(i as usize) % styles.len()].clone();

                if i % 2 == 0 {
                    labels.push(LabelCandidate::caption(u, v, text));
                } else {
                    // Alternate the direction so some segments have to be flipped
                    let segment = if seed % 2 == 0 {
                        LabelSegment::new(u, v, tile_size - v, u)
                    } else {
                        LabelSegment::new(tile_size - v, u, u, v)
                    };
                    labels.push(LabelCandidate::line(segment, text));
                }
            }

            tiles.push(VisibleTile::new(coords, labels));
        }
    }

    TileSnapshot::new(tiles)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let settings = load_settings(&args)?;
    log::info!("label settings: {:?}", settings);

    let zoom = ZoomLevel::from(args.zoom);
    let mut live = ViewPose::new(
        WorldCoords::at_ground(8704.0 * settings.tile_size, 5680.0 * settings.tile_size),
        zoom,
        Deg(0.0),
    );

    let (_, mut center) = live.snap_to_tiles(zoom, settings.tile_size);
    let tiles = SharedTileSource::new(synthetic_tiles(
        center,
        args.tiles,
        settings.tile_size as f32,
    ));
    let viewport = SharedViewport::new(live);
    let redraws = RedrawCounter::default();

    let kernel = KernelBuilder::<HeadlessEnvironment>::new()
        .with_tile_source(tiles.clone())
        .with_viewport(viewport.clone())
        .with_redraw_trigger(redraws.clone())
        .build()?;
    let mut overlay = TextOverlay::new(kernel, &settings)?;

    let mut swaps = 0;
    for frame in 0..args.frames {
        live.position.x += args.pan;
        live.angle += Deg(args.rotate);
        viewport.set(live);

        let (_, anchor) = live.snap_to_tiles(zoom, settings.tile_size);
        let tiles_changed = anchor != center;
        if tiles_changed {
            center = anchor;
            tiles.replace(synthetic_tiles(
                center,
                args.tiles,
                settings.tile_size as f32,
            ))?;
            log::debug!("frame {}: loaded tiles around {}", frame, center);
        }

        let position_changed = overlay.needs_relabel(&live, settings.tile_size);
        overlay.notify_viewport_or_tiles_changed(position_changed, tiles_changed)?;

        if overlay.on_frame_update()? {
            swaps += 1;
            if let (Some(layer), Some(pose)) = (overlay.layer(), overlay.pose()) {
                log::info!(
                    "frame {}: new layer with {} labels, {} vertices, anchored at {} z={} scale={} angle={:?}",
                    frame,
                    layer.len(),
                    layer.resources().vertices().len(),
                    pose.position,
                    pose.zoom_level,
                    pose.scale,
                    pose.angle
                );
            }
        }

        thread::sleep(Duration::from_millis(16));
    }

    overlay.shutdown()?;
    log::info!(
        "{} frames, {} layer swaps, {} redraw requests",
        args.frames,
        swaps,
        redraws.count()
    );
    Ok(())
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    #[cfg(feature = "trace")]
    enable_tracing();

    if let Err(e) = run(Args::parse()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
