use std::{path::PathBuf, time::Duration};

use sound_terrain::{animation::AnimationDriver, source, SurfaceMode, TerrainParams, TerrainSurface};

use bevy::{
    app::AppExit,
    pbr::wireframe::{Wireframe, WireframePlugin},
    prelude::*,
    render::{
        settings::{WgpuFeatures, WgpuSettings},
        RenderPlugin,
    },
};
use bevy_fly_camera::{FlyCamera, FlyCameraPlugin};
use clap::{Parser, ValueEnum};

/// Shows a terrain built from an audio analysis grid.
///
/// Space starts playback of an animated grid, R reloads the parameters file.
#[derive(Parser, Resource, Clone, Debug)]
struct Args {
    /// Grid artifact written by the analysis step
    grid: PathBuf,
    #[arg(long, value_enum, default_value_t = Mode::Terrain)]
    mode: Mode,
    /// RON file with terrain parameters
    #[arg(long)]
    params: Option<PathBuf>,
    /// Length in seconds of the audio the frames are played against
    #[arg(long, default_value_t = 10.0)]
    duration: f32,
    /// Draw triangle edges over the surface
    #[arg(long)]
    wireframe: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Profile,
    Terrain,
    ProfileOverTime,
    RingsOverTime,
}

impl From<Mode> for SurfaceMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Profile => SurfaceMode::Profile,
            Mode::Terrain => SurfaceMode::Terrain,
            Mode::ProfileOverTime => SurfaceMode::ProfileOverTime,
            Mode::RingsOverTime => SurfaceMode::RingsOverTime,
        }
    }
}

#[derive(Resource)]
struct Terrain {
    surface: TerrainSurface,
    mesh: Handle<Mesh>,
    uploaded: u64,
}

#[derive(Resource, Default)]
struct Playback {
    driver: AnimationDriver,
    timer: Timer,
}

fn main() {
    let args = Args::parse();

    let window = Window {
        title: format!("sound terrain: {}", args.grid.display()),
        ..default()
    };
    // Wireframes need line polygon mode from the device
    let render = RenderPlugin {
        wgpu_settings: WgpuSettings {
            features: WgpuFeatures::POLYGON_MODE_LINE,
            ..default()
        },
    };

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(window),
                    ..default()
                })
                .set(render),
        )
        .add_plugin(WireframePlugin)
        .add_plugin(FlyCameraPlugin)
        .insert_resource(args)
        .init_resource::<Playback>()
        .add_startup_system(setup_terrain)
        .add_systems((start_playback, advance_playback, upload_mesh).chain())
        .add_system(reload_params.before(upload_mesh))
        .run();
}

fn load_params(args: &Args) -> sound_terrain::Result<TerrainParams> {
    match &args.params {
        Some(path) => TerrainParams::load(path),
        None => Ok(TerrainParams::default()),
    }
}

fn setup_terrain(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut exit: EventWriter<AppExit>,
    args: Res<Args>,
) {
    let surface = load_params(&args).and_then(|params| {
        let grid = source::load(&args.grid)?;
        TerrainSurface::new(grid, args.mode.into(), params)
    });

    let surface = match surface {
        Ok(surface) => surface,
        Err(e) => {
            error!("Failed to build terrain from {}: {}", args.grid.display(), e);
            exit.send(AppExit);
            return;
        }
    };

    info!(
        "Built {:?} terrain with {} frames",
        surface.mode(),
        surface.frame_count()
    );

    let (min, max) = surface
        .vertices()
        .iter()
        .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let center = (min + max) / 2.;
    let extent = (max - min).max_element().max(1.);

    let mesh = meshes.add(surface.mesh().clone().into_render_mesh(false));
    let offset = surface.mode().tessellation().view_offset(extent);

    add_camera(&mut commands, center, offset);
    add_lights(&mut commands, center, center + offset, extent);

    let mut entity = commands.spawn(PbrBundle {
        mesh: mesh.clone(),
        material: materials.add(StandardMaterial {
            base_color: Color::rgb(1.0, 0.85, 0.57),
            perceptual_roughness: 0.5,
            ..default()
        }),
        ..default()
    });
    if args.wireframe {
        entity.insert(Wireframe);
    }

    commands.insert_resource(Terrain {
        uploaded: surface.revision(),
        surface,
        mesh,
    });
}

fn start_playback(
    keys: Res<Input<KeyCode>>,
    args: Res<Args>,
    terrain: Option<Res<Terrain>>,
    mut playback: ResMut<Playback>,
) {
    let Some(terrain) = terrain else { return };

    if !keys.just_pressed(KeyCode::Space) {
        return;
    }

    if !terrain.surface.mode().is_animated() {
        info!("{:?} terrain has no frames to play", terrain.surface.mode());
        return;
    }

    if terrain
        .surface
        .start_playback(&mut playback.driver, args.duration)
    {
        info!(
            "Playing {} frames, one every {:?}",
            terrain.surface.frame_count(),
            playback.driver.interval()
        );
        playback.timer = Timer::new(Duration::ZERO, TimerMode::Once);
    }
}

fn advance_playback(
    time: Res<Time>,
    terrain: Option<ResMut<Terrain>>,
    mut playback: ResMut<Playback>,
) {
    let Some(mut terrain) = terrain else { return };

    if !playback.driver.is_running() {
        return;
    }

    playback.timer.tick(time.delta());
    if !playback.timer.finished() {
        return;
    }

    let playback = &mut *playback;
    match terrain.surface.step(&mut playback.driver) {
        Some(tick) => playback.timer = Timer::new(tick.wait, TimerMode::Once),
        None => info!("Playback finished"),
    }
}

fn reload_params(keys: Res<Input<KeyCode>>, args: Res<Args>, terrain: Option<ResMut<Terrain>>) {
    let Some(mut terrain) = terrain else { return };

    if !keys.just_pressed(KeyCode::R) {
        return;
    }

    match load_params(&args) {
        Ok(params) => {
            if let Ok(change) = terrain.surface.apply(params) {
                info!("Reloaded parameters ({:?})", change);
            }
        }
        Err(e) => warn!("Keeping current parameters: {}", e),
    }
}

fn upload_mesh(terrain: Option<ResMut<Terrain>>, mut meshes: ResMut<Assets<Mesh>>) {
    let Some(mut terrain) = terrain else { return };

    let revision = terrain.surface.revision();
    if revision == terrain.uploaded {
        return;
    }

    if let Some(mesh) = meshes.get_mut(&terrain.mesh) {
        *mesh = terrain.surface.mesh().clone().into_render_mesh(false);
    }
    terrain.uploaded = revision;
}

fn add_camera(commands: &mut Commands, center: Vec3, offset: Vec3) {
    commands
        .spawn(Camera3dBundle {
            transform: Transform::from_translation(center + offset).looking_at(center, Vec3::Y),
            ..default()
        })
        .insert(fly_camera_facing(-offset));
}

/// FlyCamera rewrites the rotation from its yaw and pitch every frame, so
/// those have to agree with the initial look direction.
fn fly_camera_facing(direction: Vec3) -> FlyCamera {
    let direction = direction.normalize();
    FlyCamera {
        yaw: (-direction.x).atan2(-direction.z).to_degrees(),
        pitch: (-direction.y).asin().to_degrees(),
        ..default()
    }
}

fn add_lights(commands: &mut Commands, center: Vec3, viewpoint: Vec3, extent: f32) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 0.08,
    });

    // Key light above and to the right of the viewer
    let position = viewpoint + Vec3::new(extent * 0.5, extent, 0.);
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 20_000.,
            ..default()
        },
        transform: Transform::from_translation(position).looking_at(center, Vec3::Y),
        ..default()
    });
}
