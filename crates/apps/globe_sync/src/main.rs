use std::cell::Cell;
use std::env;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use foundation::bounds::LatLngBounds;
use foundation::math::LatLng;
use layers::map::{Map, map_type};
use layers::{
    Circle, KmlLayer, Marker, MarkerIcon, Overlay, Polyline, Rectangle, ShapeStyle, Size,
    UnsupportedOverlay,
};
use mirror::config::{CONFIG_ENV_VAR, MirrorConfig};
use mirror::error::ConfigError;
use mirror::link::GlobeLink;
use mirror::registry::IdentityRegistry;
use mirror::services::MirrorServices;
use runtime::frame::FrameClock;
use runtime::scheduler::Scheduler;
use scene::camera::FlySpeed;
use scene::surface::GlobeSurface;
use scene::world::Globe;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod services;

use services::{DeferredImages, DeferredKml};

const PARKS_KML: &str = "http://example.com/parks.kml";

#[derive(Parser, Debug)]
#[command(author, version, about = "Scripted map/globe synchronization session")]
struct Args {
    /// JSON config file (falls back to $GLOBE_SYNC_CONFIG, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 240)]
    frames: u64,

    /// Frame length in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Frames a simulated image or KML download takes
    #[arg(long, default_value_t = 6)]
    latency: u64,

    /// Frames before the globe surface becomes available
    #[arg(long, default_value_t = 3)]
    surface_delay: u32,
}

#[derive(Serialize)]
struct Summary {
    frames: u64,
    linked: bool,
    mirrored_overlays: usize,
    globe_features: usize,
    map_center: [f64; 2],
    map_zoom: i32,
    map_type: String,
    scrollwheel: bool,
    globe_visible: bool,
    globe_range_m: f64,
    pending_loads: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config_path = args
        .config
        .clone()
        .or_else(|| env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from));
    let config = Rc::new(load_config(config_path.as_deref())?);

    let scheduler = Rc::new(Scheduler::new());
    let clock = Rc::new(FrameClock::new(args.dt));
    let images = DeferredImages::new(scheduler.clone(), clock.clone(), args.latency)
        .with_image(&config.absolute_url("/icons/pin.png"), Size::new(24.0, 40.0));
    let kml = DeferredKml::new(scheduler.clone(), clock.clone(), args.latency)
        .with_document(PARKS_KML, "<kml><Document><name>Parks</name></Document></kml>");
    let services = MirrorServices::new(Rc::new(images), Rc::new(kml));

    let map = Map::new(LatLng::new(37.42, -122.08), 12);
    let globe = Rc::new(Globe::new());

    let pin: Overlay = Marker::new(LatLng::new(37.42, -122.08))
        .with_title("Campus")
        .with_icon(MarkerIcon::new("/icons/pin.png"))
        .into();
    let route = Polyline::new(vec![
        LatLng::new(37.40, -122.10),
        LatLng::new(37.42, -122.08),
        LatLng::new(37.44, -122.06),
    ])
    .with_style(ShapeStyle::stroke("#3366ff", 0.9, 4.0));
    let zone = Circle::new(LatLng::new(37.43, -122.09), 1_500.0)
        .with_style(ShapeStyle::stroke("#ff0000", 1.0, 2.0).with_fill("#ff0000", 0.25));
    let block = Rectangle::new(LatLngBounds::new(
        LatLng::new(37.41, -122.11),
        LatLng::new(37.42, -122.10),
    ));
    map.add_overlay(pin);
    map.add_overlay(route.clone());
    map.add_overlay(zone.clone());
    map.add_overlay(block);
    map.add_overlay(KmlLayer::new(PARKS_KML));
    map.add_overlay(UnsupportedOverlay::new("GroundOverlay"));

    let surface_delay = args.surface_delay;
    let polls = Cell::new(0u32);
    let link = {
        let globe = globe.clone();
        GlobeLink::new(
            map.clone(),
            Rc::new(IdentityRegistry::new()),
            services,
            config.clone(),
            Box::new(move || {
                polls.set(polls.get() + 1);
                (polls.get() > surface_delay).then(|| globe.clone() as Rc<dyn GlobeSurface>)
            }),
        )
    };
    let _initialized = link.on_event(|e| info!("link event: {e:?}"));

    for _ in 0..args.frames {
        let frame = clock.current();
        if let Err(e) = link.tick(frame) {
            error!("giving up: {e}");
            return Err(e.into());
        }
        scheduler.run_frame(frame);
        globe.tick(frame);
        script(frame.index, &map, &globe, &route, &zone, &config);
        clock.advance();
    }

    let lookat = globe.view();
    let center = map.center().get();
    let summary = Summary {
        frames: args.frames,
        linked: link.is_ready(),
        mirrored_overlays: link.scene_mirror().map_or(0, |m| m.len()),
        globe_features: globe.feature_count(),
        map_center: [center.lat, center.lng],
        map_zoom: map.zoom().get(),
        map_type: map.map_type_id().get(),
        scrollwheel: map.scrollwheel().get(),
        globe_visible: globe.is_window_visible(),
        globe_range_m: lookat.range,
        pending_loads: scheduler.pending(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<MirrorConfig, ConfigError> {
    match path {
        Some(path) => {
            info!("loading config from {}", path.display());
            MirrorConfig::load(path)
        }
        None => Ok(MirrorConfig::default()),
    }
}

/// User actions replayed at fixed frames.
fn script(
    index: u64,
    map: &Map,
    globe: &Globe,
    route: &Polyline,
    zone: &Circle,
    config: &MirrorConfig,
) {
    match index {
        20 => map.map_type_id().set(config.map_type_name.clone()),
        30 => {
            route.path().insert_at(1, LatLng::new(37.41, -122.09));
            route.path().remove_at(0);
            zone.radius().set(3_000.0);
        }
        40 => {
            let mut tilted = globe.view();
            tilted.tilt = 35.0;
            tilted.heading = 20.0;
            globe.set_view(tilted, FlySpeed::Teleport);
        }
        45 => map.map_type_id().set(map_type::SATELLITE.to_string()),
        60 => {
            map.remove_overlay(&Overlay::from(zone.clone()));
        }
        _ => {}
    }
}
