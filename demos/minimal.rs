//! A minimal example showing the steps needed to get started with the plugin.

use bevy::{prelude::*, window::PrimaryWindow, winit::cursor::CursorIcon};
use bevy_examiner_cam::prelude::*;
use bevy_log::info;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            MeshPickingPlugin,
            DefaultExaminerCamPlugins, // Step 1: Add camera controller plugin
        ))
        .add_systems(Startup, (setup_camera, setup_scene))
        .add_systems(Update, (show_navigation_cursor, log_viewer_events))
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(4.0, 3.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        ExaminerCam::default(), // Step 2: add camera controller component to any cameras
        FocalDistance(Vec3::new(4.0, 3.0, 6.0).length()),
    ));
}

//
// --- The below code is not important for the example ---
//

fn show_navigation_cursor(
    cameras: Query<&ExaminerCam, Changed<ExaminerCam>>,
    mut window: Query<&mut CursorIcon, With<PrimaryWindow>>,
    mut commands: Commands,
    primary: Query<Entity, With<PrimaryWindow>>,
) {
    let Some(examiner_cam) = cameras.iter().next() else {
        return;
    };
    let icon = CursorIcon::from(examiner_cam.mode().cursor_icon());
    match window.single_mut() {
        Ok(mut current) if *current != icon => *current = icon,
        Ok(_) => {}
        Err(_) => {
            if let Ok(entity) = primary.single() {
                commands.entity(entity).insert(icon);
            }
        }
    }
}

fn log_viewer_events(
    mut clicks: EventReader<ViewportClick>,
    mut menus: EventReader<ContextMenuRequest>,
) {
    for click in clicks.read() {
        info!("clicked {:?}", click.hit);
    }
    for menu in menus.read() {
        info!("context menu requested at {}", menu.position);
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let cube = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    for (i, color) in [
        Color::srgb(0.8, 0.3, 0.3),
        Color::srgb(0.3, 0.8, 0.3),
        Color::srgb(0.3, 0.3, 0.8),
    ]
    .into_iter()
    .enumerate()
    {
        commands.spawn((
            Mesh3d(cube.clone()),
            MeshMaterial3d(materials.add(color)),
            Transform::from_xyz(i as f32 * 1.5 - 1.5, 0.0, 0.0),
        ));
    }
    commands.spawn((
        DirectionalLight::default(),
        Transform::from_xyz(3.0, 8.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let text = [
        "Left Mouse - Orbit, release while moving to spin",
        "Middle Mouse - Pan, click to recenter",
        "Left + Middle Mouse - Zoom",
        "Ctrl or Shift + Left Mouse - Select",
        "S, then click - Seek to point",
    ]
    .join("\n");
    commands.spawn((
        Text::new(text),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        Node {
            margin: UiRect::all(Val::Px(20.0)),
            ..Default::default()
        },
    ));
}
