use std::{f32::consts::FRAC_PI_2, ops::Range};

use bevy::{
    asset::RenderAssetUsages,
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll},
    prelude::*,
    render::mesh::PrimitiveTopology,
};
use bevy_egui::{egui, EguiContexts, EguiPlugin};
use cavern::{ConfigError, GenerationConfig, Grid, GridConsumer, MapGenerator, OffGridRule, Tile};

/// Extruded wall geometry for the last grid handed over by the generator.
/// Walls are one tile high, the map lies in the XZ plane centered on the
/// origin.
#[derive(Default)]
struct WallMesh {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    dirty: bool,
}

impl WallMesh {
    fn quad(&mut self, min: Vec3, u: Vec3, v: Vec3) {
        let n = u.cross(v).normalize().to_array();
        self.positions.push(min.to_array());
        self.positions.push((min + u).to_array());
        self.positions.push((min + v).to_array());
        self.positions.push((min + v).to_array());
        self.positions.push((min + u).to_array());
        self.positions.push((min + u + v).to_array());
        self.normals.extend([n; 6]);
    }

    fn rebuild(&mut self, grid: &Grid, tile_size: f32) {
        self.positions.clear();
        self.normals.clear();

        let wall = |i: i32, j: i32| grid.cell(IVec2::new(i, j)) == Some(Tile::Wall);
        let dx = Vec3::X * tile_size;
        let dy = Vec3::Y * tile_size;
        let dz = Vec3::Z * tile_size;
        let offset = -Vec3::new(grid.width() as f32, 0., grid.height() as f32) * tile_size / 2.;
        let corner = |i: i32, j: i32| offset + Vec3::new(i as f32, 0., j as f32) * tile_size;

        let w = grid.width() as i32;
        let h = grid.height() as i32;

        // Top faces
        for j in 0..h {
            for i in 0..w {
                if wall(i, j) {
                    self.quad(corner(i, j) + dy, dz, dx);
                }
            }
        }
        // X faces
        for i in 0..=w {
            for j in 0..h {
                let cur = wall(i, j);
                let prev = wall(i - 1, j);
                if cur != prev {
                    if prev {
                        self.quad(corner(i, j), dy, dz);
                    } else {
                        self.quad(corner(i, j), dz, dy);
                    }
                }
            }
        }
        // Z faces, along the grid rows
        for j in 0..=h {
            for i in 0..w {
                let cur = wall(i, j);
                let prev = wall(i, j - 1);
                if cur != prev {
                    if prev {
                        self.quad(corner(i, j), dx, dy);
                    } else {
                        self.quad(corner(i, j), dy, dx);
                    }
                }
            }
        }

        self.dirty = true;
    }

    /// Move the buffers into a new mesh.
    fn take_mesh(&mut self) -> Mesh {
        self.dirty = false;
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, std::mem::take(&mut self.positions))
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, std::mem::take(&mut self.normals))
    }
}

impl GridConsumer for WallMesh {
    fn consume(&mut self, grid: &Grid, tile_size: f32) {
        #[cfg(feature = "trace")]
        let _span = info_span!("rebuild_mesh").entered();

        self.rebuild(grid, tile_size);
    }
}

#[derive(Resource)]
struct Cave {
    generator: MapGenerator<WallMesh>,
}

#[derive(Debug, Resource)]
struct CameraSettings {
    distance_speed: f32,
    pitch_speed: f32,
    pitch_range: Range<f32>,
    yaw_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        // Limiting pitch stops some unexpected rotation past 90° up or down.
        let pitch_limit = FRAC_PI_2 - 0.01;
        Self {
            distance_speed: 6.0,
            pitch_speed: 0.003,
            pitch_range: -pitch_limit..pitch_limit,
            yaw_speed: 0.004,
        }
    }
}

#[derive(Component)]
struct Root;

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut cave: ResMut<Cave>,
) {
    // camera
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 70.0, 45.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // light
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-30.0, 48.0, 16.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let mesh = meshes.add(cave.generator.consumer_mut().take_mesh());
    commands.spawn((
        Transform::IDENTITY,
        Mesh3d(mesh),
        MeshMaterial3d(materials.add(Color::srgb_u8(124, 144, 255))),
        Root,
    ));
}

fn close_on_esc(mut ev_app_exit: EventWriter<AppExit>, input: Res<ButtonInput<KeyCode>>) {
    if input.just_pressed(KeyCode::Escape) {
        ev_app_exit.send(AppExit::Success);
    }
}

/// `A` regenerates the map, `S` smooths the current one once more.
fn keyboard_controls(
    mut contexts: EguiContexts,
    input: Res<ButtonInput<KeyCode>>,
    mut cave: ResMut<Cave>,
) {
    if contexts.ctx_mut().wants_keyboard_input() {
        return;
    }
    if input.just_pressed(KeyCode::KeyA) {
        cave.generator.regenerate();
    }
    if input.just_pressed(KeyCode::KeyS) {
        cave.generator.smooth_once();
    }
}

fn ui_config(mut contexts: EguiContexts, mut cave: ResMut<Cave>) {
    egui::Window::new("Config").show(contexts.ctx_mut(), |ui| {
        let mut config = cave.generator.config().clone();

        ui.horizontal(|ui| {
            if ui.button("Regenerate (A)").clicked() {
                cave.generator.regenerate();
            }
            if ui.button("Smooth once (S)").clicked() {
                cave.generator.smooth_once();
            }
        });
        ui.label(format!("Seed: {}", cave.generator.seed()));

        ui.separator();

        ui.add(egui::Slider::new(&mut config.width, 8..=256).text("Width"));
        ui.add(egui::Slider::new(&mut config.height, 8..=256).text("Height"));
        ui.add(egui::Slider::new(&mut config.border, 0..=50).text("Border"));
        ui.add(egui::Slider::new(&mut config.tile_size, 0.1..=4.0).text("Tile size"));

        ui.label("Initial fill");
        ui.indent(1, |ui| {
            ui.add(egui::Slider::new(&mut config.fill_percent, 0..=100).text("Fill percent"));
            ui.checkbox(&mut config.use_random_seed, "Random seed");
            ui.add_enabled_ui(!config.use_random_seed, |ui| {
                ui.text_edit_singleline(&mut config.seed);
            });
        });

        ui.label("Smoothing");
        ui.indent(2, |ui| {
            ui.add(
                egui::Slider::new(&mut config.smoothing_threshold, 2..=6).text("Wall neighbors"),
            );
            let mut uniform = config.off_grid_rule == OffGridRule::AllWall;
            ui.checkbox(&mut uniform, "Uniform edges");
            config.off_grid_rule = if uniform {
                OffGridRule::AllWall
            } else {
                OffGridRule::Skewed
            };
        });

        ui.label("Pruning");
        ui.indent(3, |ui| {
            ui.add(
                egui::Slider::new(&mut config.wall_region_threshold, 0..=200)
                    .text("Min wall region"),
            );
            ui.add(
                egui::Slider::new(&mut config.room_region_threshold, 0..=200)
                    .text("Min room region"),
            );
        });

        // Only regenerate when something actually changed
        if &config != cave.generator.config() {
            if let Err(err) = cave.generator.reconfigure(config) {
                warn!("rejected config: {err}");
            }
        }
    });
}

fn upload_mesh(
    mut meshes: ResMut<Assets<Mesh>>,
    mut cave: ResMut<Cave>,
    q_root: Query<&Mesh3d, With<Root>>,
) {
    if !cave.generator.consumer().dirty {
        return;
    }
    let Ok(handle) = q_root.get_single() else {
        return;
    };
    let Some(mesh) = meshes.get_mut(handle) else {
        return;
    };
    *mesh = cave.generator.consumer_mut().take_mesh();
}

fn orbit_camera(
    mut camera: Single<&mut Transform, With<Camera>>,
    camera_settings: Res<CameraSettings>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
) {
    let mut distance = camera.translation.length();
    distance -= mouse_scroll.delta.y * camera_settings.distance_speed;

    if mouse_buttons.pressed(MouseButton::Right) {
        // Mouse motion is already the full movement since the last frame, so it
        // is not scaled by delta time.
        let delta = -mouse_motion.delta;
        let delta_pitch = delta.y * camera_settings.pitch_speed;
        let delta_yaw = delta.x * camera_settings.yaw_speed;

        let (yaw, pitch, roll) = camera.rotation.to_euler(EulerRot::YXZ);
        let pitch = (pitch + delta_pitch).clamp(
            camera_settings.pitch_range.start,
            camera_settings.pitch_range.end,
        );
        let yaw = yaw + delta_yaw;
        camera.rotation = Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll);
    }

    let target = Vec3::ZERO;
    camera.translation = target - camera.forward() * distance;
}

fn main() -> Result<(), ConfigError> {
    let config = GenerationConfig::default().with_seed("cavern");
    let generator = MapGenerator::new(config, WallMesh::default())?;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Cave Viewer".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(Cave { generator })
        .init_resource::<CameraSettings>()
        .add_systems(Startup, setup)
        .add_systems(Update, close_on_esc)
        .add_systems(Update, (keyboard_controls, ui_config))
        .add_systems(Update, orbit_camera)
        .add_systems(PostUpdate, upload_mesh)
        .run();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_wall_is_a_box() {
        let mut walls = WallMesh::default();
        walls.rebuild(&Grid::from_rows(&[[1]]), 2.0);
        // top plus four sides
        assert_eq!(walls.positions.len(), 5 * 6);
        assert_eq!(walls.normals.len(), walls.positions.len());
        assert!(walls.dirty);

        let mut ups = 0;
        for n in &walls.normals {
            assert!((Vec3::from_array(*n).length() - 1.0).abs() < 1e-5);
            if *n == [0.0, 1.0, 0.0] {
                ups += 1;
            }
        }
        assert_eq!(ups, 6);

        // centered on the origin, extruded by one tile
        for p in &walls.positions {
            assert!(p[0].abs() <= 1.0 && p[2].abs() <= 1.0);
            assert!(p[1] == 0.0 || p[1] == 2.0);
        }
    }

    #[test]
    fn shared_faces_are_skipped() {
        let mut walls = WallMesh::default();
        walls.rebuild(&Grid::from_rows(&[[1, 1, 0]]), 1.0);
        // two tops, two ends along X, two sides each along Z
        assert_eq!(walls.positions.len(), 8 * 6);

        let mesh = walls.take_mesh();
        assert!(!walls.dirty);
        assert!(walls.positions.is_empty());
        assert_eq!(mesh.count_vertices(), 8 * 6);
    }

    #[test]
    fn outward_normals() {
        let mut walls = WallMesh::default();
        walls.rebuild(&Grid::from_rows(&[[1]]), 1.0);
        for (tri, n) in walls.positions.chunks(3).zip(walls.normals.chunks(3)) {
            let a = Vec3::from_array(tri[0]);
            let b = Vec3::from_array(tri[1]);
            let c = Vec3::from_array(tri[2]);
            let winding = (b - a).cross(c - a).normalize();
            assert!(winding.distance(Vec3::from_array(n[0])) < 1e-5);
        }
    }
}
