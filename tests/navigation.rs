//! Full gestures driven through [`ExaminerCam::handle`], with a recording viewer standing in for
//! the host.

use std::time::Duration;

use bevy_examiner_cam::controller::camera::{focal_point, world_to_screen};
use bevy_examiner_cam::prelude::*;
use bevy_input::{keyboard::KeyCode, mouse::MouseButton, ButtonState};
use bevy_math::prelude::*;

#[derive(Default)]
struct RecordingViewer {
    editing: bool,
    viewing: bool,
    foreground: bool,
    pick: Option<Vec3>,
    forwarded: Vec<NavEvent>,
    clicks: Vec<NavEvent>,
    menus: Vec<Vec2>,
}

impl Viewer for RecordingViewer {
    fn is_editing(&self) -> bool {
        self.editing
    }

    fn is_viewing(&self) -> bool {
        self.viewing
    }

    fn set_viewing(&mut self, viewing: bool) {
        self.viewing = viewing;
    }

    fn offer_to_foreground(&mut self, _event: &NavEvent) -> bool {
        self.foreground
    }

    fn forward(&mut self, event: &NavEvent) -> bool {
        self.forwarded.push(*event);
        false
    }

    fn click(&mut self, event: &NavEvent) -> bool {
        self.clicks.push(*event);
        false
    }

    fn open_popup_menu(&mut self, position: Vec2) {
        self.menus.push(position);
    }

    fn pick(&self, _camera: &dyn CameraAdapter, _position: Vec2) -> Option<Vec3> {
        self.pick
    }
}

const CENTER: Vec2 = Vec2::new(400.0, 300.0);

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn press(button: MouseButton, position: Vec2, millis: u64) -> NavEvent {
    NavEvent::button(button, ButtonState::Pressed, position, ms(millis))
}

fn release(button: MouseButton, position: Vec2, millis: u64) -> NavEvent {
    NavEvent::button(button, ButtonState::Released, position, ms(millis))
}

fn key(key: KeyCode) -> NavEvent {
    NavEvent::key(key, ButtonState::Pressed, CENTER, Duration::ZERO)
}

struct Harness {
    cam: ExaminerCam,
    camera: ViewCamera,
    viewer: RecordingViewer,
}

impl Harness {
    fn new() -> Self {
        Self {
            cam: ExaminerCam::default(),
            camera: ViewCamera::default(),
            viewer: RecordingViewer::default(),
        }
    }

    fn send(&mut self, event: NavEvent) -> bool {
        self.cam.handle(&event, &mut self.camera, &mut self.viewer)
    }

    fn tick(&mut self, millis: u64) -> bool {
        self.cam.tick(ms(millis), &mut self.camera)
    }
}

#[test]
fn shift_click_recenters_on_picked_point() {
    let mut h = Harness::new();
    h.cam.settings.recenter.animate = false;
    h.viewer.pick = Some(Vec3::new(1.0, 1.0, 0.0));
    let rotation = h.camera.transform.rotation;

    h.send(press(MouseButton::Left, CENTER, 0).with_modifiers(Modifiers::SHIFT));
    assert_eq!(h.cam.mode(), NavigationMode::Selection);
    assert!(h.send(release(MouseButton::Left, CENTER, 100).with_modifiers(Modifiers::SHIFT)));

    assert!(h
        .camera
        .transform
        .translation
        .abs_diff_eq(Vec3::new(1.0, 1.0, 10.0), 1e-4));
    assert_eq!(h.camera.transform.rotation, rotation);
}

#[test]
fn slow_shift_click_does_not_recenter() {
    let mut h = Harness::new();
    h.cam.settings.recenter.animate = false;
    h.viewer.pick = Some(Vec3::new(1.0, 1.0, 0.0));
    let before = h.camera.clone();

    h.send(press(MouseButton::Left, CENTER, 0).with_modifiers(Modifiers::SHIFT));
    h.send(release(MouseButton::Left, CENTER, 500).with_modifiers(Modifiers::SHIFT));

    assert_eq!(h.camera, before);
}

#[test]
fn middle_click_animates_recenter() {
    let mut h = Harness::new();
    h.viewer.pick = Some(Vec3::new(-2.0, 0.5, 0.0));

    h.send(press(MouseButton::Middle, CENTER, 0));
    assert_eq!(h.cam.mode(), NavigationMode::Panning);
    h.send(release(MouseButton::Middle, CENTER, 100));
    assert_eq!(h.cam.mode(), NavigationMode::Idle);
    assert!(h.cam.is_animating());
    assert_eq!(h.camera.transform.translation, Vec3::new(0.0, 0.0, 10.0));

    assert!(h.tick(300));
    assert!(!h.cam.is_animating());
    assert!(h
        .camera
        .transform
        .translation
        .abs_diff_eq(Vec3::new(-2.0, 0.5, 10.0), 1e-4));
}

#[test]
fn middle_drag_pans_without_recentering() {
    let mut h = Harness::new();
    h.viewer.pick = Some(Vec3::new(5.0, 5.0, 0.0));
    let rotation = h.camera.transform.rotation;

    h.send(press(MouseButton::Middle, CENTER, 0));
    h.send(NavEvent::moved(CENTER + Vec2::new(80.0, 0.0), ms(50)));
    h.send(release(MouseButton::Middle, CENTER + Vec2::new(80.0, 0.0), 100));
    h.tick(500);

    let translation = h.camera.transform.translation;
    assert!(translation.x < 0.0);
    assert!(translation.y.abs() < 1e-4);
    assert!((translation.z - 10.0).abs() < 1e-4);
    assert_eq!(h.camera.transform.rotation, rotation);
    assert_eq!(h.cam.mode(), NavigationMode::Idle);
}

#[test]
fn flick_keeps_spinning_about_focal_point() {
    let mut h = Harness::new();
    let center = focal_point(&h.camera);

    h.send(press(MouseButton::Left, CENTER, 0));
    assert_eq!(h.cam.mode(), NavigationMode::Dragging);
    for (i, x) in [420.0, 440.0, 460.0].into_iter().enumerate() {
        h.send(NavEvent::moved(Vec2::new(x, 300.0), ms(10 + i as u64 * 10)));
    }
    h.send(release(MouseButton::Left, Vec2::new(460.0, 300.0), 35));
    assert_eq!(h.cam.mode(), NavigationMode::Spinning);
    assert!(h.cam.is_animating());

    let spin = h.cam.state().spin.unwrap();
    let before = h.camera.transform;
    assert!(h.tick(100));
    let (_, turned) = (h.camera.transform.rotation * before.rotation.inverse()).to_axis_angle();
    assert!((turned - spin.angular_velocity * 0.1).abs() < 1e-3);
    assert!(focal_point(&h.camera).abs_diff_eq(center, 1e-3));

    // Any press stops the spin.
    h.send(press(MouseButton::Left, Vec2::new(460.0, 300.0), 200));
    assert_eq!(h.cam.mode(), NavigationMode::Dragging);
    assert!(h.cam.state().spin.is_none());
}

#[test]
fn slow_release_ends_in_idle() {
    let mut h = Harness::new();

    h.send(press(MouseButton::Left, CENTER, 0));
    for (i, x) in [410.0, 420.0, 430.0].into_iter().enumerate() {
        h.send(NavEvent::moved(Vec2::new(x, 300.0), ms(10 + i as u64 * 10)));
    }
    assert!(!h.cam.state().log.is_empty());
    h.send(release(MouseButton::Left, Vec2::new(430.0, 300.0), 500));

    assert_eq!(h.cam.mode(), NavigationMode::Idle);
    assert!(h.cam.state().log.is_empty());
    let before = h.camera.clone();
    assert!(!h.tick(100));
    assert_eq!(h.camera, before);
}

#[test]
fn chord_zoom_keeps_anchor_under_press_position() {
    let mut h = Harness::new();
    let position = Vec2::new(600.0, 200.0);

    h.send(press(MouseButton::Left, position, 0));
    assert!(h.send(press(MouseButton::Middle, position, 10)));
    assert_eq!(h.cam.mode(), NavigationMode::Zooming);
    let anchor = h.cam.state().zoom_anchor.unwrap();

    for (i, y) in [190.0, 175.0, 150.0].into_iter().enumerate() {
        h.send(NavEvent::moved(Vec2::new(600.0, y), ms(20 + i as u64 * 10)));
        let screen = world_to_screen(&h.camera, anchor.world).unwrap();
        assert!(screen.abs_diff_eq(anchor.screen, 1e-3));
    }
    // Moving up zooms in.
    assert!(h.camera.focal_distance < 10.0);
}

#[test]
fn wheel_is_always_forwarded() {
    let mut h = Harness::new();
    let wheel = NavEvent::wheel(Vec2::new(0.0, 1.0), CENTER, Duration::ZERO);

    assert!(!h.send(wheel));
    h.send(press(MouseButton::Left, CENTER, 0));
    assert_eq!(h.cam.mode(), NavigationMode::Dragging);
    assert!(!h.send(wheel));

    assert_eq!(h.viewer.forwarded, vec![wheel, wheel]);
    assert_eq!(h.cam.mode(), NavigationMode::Dragging);
}

#[test]
fn ctrl_hands_primary_button_to_selection() {
    let mut h = Harness::new();
    let before = h.camera.clone();

    h.send(key(KeyCode::ControlLeft).with_modifiers(Modifiers::CTRL));
    assert_eq!(h.cam.mode(), NavigationMode::Selection);
    assert_eq!(h.viewer.forwarded.len(), 1);

    h.send(press(MouseButton::Left, CENTER, 0).with_modifiers(Modifiers::CTRL));
    assert_eq!(h.cam.mode(), NavigationMode::Selection);
    assert_eq!(h.viewer.clicks.len(), 1);
    assert_eq!(h.viewer.forwarded.len(), 2);
    assert_eq!(h.camera, before);
}

#[test]
fn ctrl_click_from_idle_selects() {
    let mut h = Harness::new();

    h.send(press(MouseButton::Left, CENTER, 0).with_modifiers(Modifiers::CTRL));

    assert_eq!(h.cam.mode(), NavigationMode::Selection);
    assert_eq!(h.viewer.clicks.len(), 1);
    assert_eq!(h.viewer.forwarded.len(), 1);
}

#[test]
fn editing_keeps_selection_alive() {
    let mut h = Harness::new();
    h.viewer.editing = true;

    h.send(key(KeyCode::ControlLeft).with_modifiers(Modifiers::CTRL));
    assert_eq!(h.cam.mode(), NavigationMode::Selection);

    // Ctrl and middle would otherwise zoom.
    assert!(!h.send(press(MouseButton::Middle, CENTER, 0).with_modifiers(Modifiers::CTRL)));
    assert_eq!(h.cam.mode(), NavigationMode::Selection);
    assert_eq!(h.viewer.forwarded.len(), 2);
}

#[test]
fn repeated_motion_changes_nothing() {
    let mut h = Harness::new();

    h.send(NavEvent::moved(CENTER, ms(0)));
    h.send(NavEvent::moved(CENTER, ms(10)));
    assert_eq!(h.cam.mode(), NavigationMode::Idle);

    h.send(press(MouseButton::Left, CENTER, 20));
    let before = h.camera.clone();
    h.send(NavEvent::moved(CENTER, ms(30)));
    h.send(NavEvent::moved(CENTER, ms(40)));
    assert_eq!(h.camera, before);
    assert_eq!(h.cam.mode(), NavigationMode::Dragging);
}

#[test]
fn secondary_click_opens_menu() {
    let mut h = Harness::new();
    let position = Vec2::new(120.0, 80.0);

    h.send(press(MouseButton::Right, position, 0));
    h.send(release(MouseButton::Right, position, 50));

    assert_eq!(h.viewer.menus, vec![position]);
}

#[test]
fn secondary_release_after_camera_move_is_swallowed() {
    let mut h = Harness::new();
    let both = Modifiers {
        ctrl: true,
        shift: true,
    };

    h.send(press(MouseButton::Right, CENTER, 0).with_modifiers(both));
    assert_eq!(h.cam.mode(), NavigationMode::Zooming);
    let up = CENTER - Vec2::new(0.0, 40.0);
    h.send(NavEvent::moved(up, ms(20)).with_modifiers(both));
    assert!(h.camera.focal_distance < 10.0);
    assert!(h.send(release(MouseButton::Right, up, 40).with_modifiers(both)));

    assert!(h.viewer.menus.is_empty());
}

#[test]
fn seek_flies_to_picked_point() {
    let mut h = Harness::new();
    h.viewer.pick = Some(Vec3::new(0.0, 0.0, -2.0));

    assert!(h.send(key(KeyCode::KeyS)));
    assert_eq!(h.cam.mode(), NavigationMode::SeekWait);

    h.send(press(MouseButton::Left, CENTER, 0));
    assert_eq!(h.cam.mode(), NavigationMode::Seek);
    assert!(h.cam.is_animating());

    // Input during the flight goes straight to the viewer.
    h.send(NavEvent::moved(CENTER + Vec2::new(10.0, 0.0), ms(10)));
    h.send(release(MouseButton::Left, CENTER, 20));
    assert_eq!(h.viewer.forwarded.len(), 2);

    assert!(h.tick(1000));
    assert_eq!(h.cam.mode(), NavigationMode::Seek);
    assert!(h.tick(1500));
    assert_eq!(h.cam.mode(), NavigationMode::Idle);
    assert!(h
        .camera
        .transform
        .translation
        .abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-3));
    assert!((h.camera.focal_distance - 6.0).abs() < 1e-3);
}

#[test]
fn seek_miss_returns_to_idle() {
    let mut h = Harness::new();
    let before = h.camera.clone();

    h.send(key(KeyCode::KeyS));
    h.send(press(MouseButton::Left, CENTER, 0));

    assert_eq!(h.cam.mode(), NavigationMode::Idle);
    assert!(!h.cam.is_animating());
    assert_eq!(h.camera, before);
}

#[test]
fn escape_cancels_seek() {
    let mut h = Harness::new();

    h.send(key(KeyCode::KeyS));
    assert!(h.send(key(KeyCode::Escape)));

    assert_eq!(h.cam.mode(), NavigationMode::Idle);
}

#[test]
fn keyboard_zooms_and_pans() {
    let mut h = Harness::new();
    let rotation = h.camera.transform.rotation;

    h.send(NavEvent::moved(CENTER, ms(0)));
    h.send(key(KeyCode::PageUp));
    assert!(h.camera.focal_distance < 10.0);
    h.send(key(KeyCode::PageDown));
    assert!((h.camera.focal_distance - 10.0).abs() < 1e-3);

    h.send(key(KeyCode::ArrowLeft));
    assert!(h.camera.transform.translation.x.abs() > 1e-3);
    assert_eq!(h.camera.transform.rotation, rotation);
    assert_eq!(h.cam.mode(), NavigationMode::Idle);
}

#[test]
fn motion3d_is_consumed() {
    let mut h = Harness::new();

    let event = NavEvent::motion3d(Vec3::X, Quat::IDENTITY, CENTER, Duration::ZERO);
    assert!(h.send(event));

    assert!(h
        .camera
        .transform
        .translation
        .abs_diff_eq(Vec3::new(1.0, 0.0, 10.0), 1e-4));
    assert!(h.viewer.forwarded.is_empty());
}

#[test]
fn foreground_content_takes_events_first() {
    let mut h = Harness::new();
    h.viewer.foreground = true;

    assert!(h.send(press(MouseButton::Left, CENTER, 0)));

    assert_eq!(h.cam.mode(), NavigationMode::Idle);
    assert!(h.viewer.forwarded.is_empty());
}

#[test]
fn other_events_never_change_mode() {
    let mut h = Harness::new();
    let other = NavEvent::new(NavEventKind::Other, CENTER, Duration::ZERO);

    assert!(h.send(other));
    assert_eq!(h.cam.mode(), NavigationMode::Idle);
    assert!(h.viewer.forwarded.is_empty());

    h.send(key(KeyCode::ControlLeft).with_modifiers(Modifiers::CTRL));
    h.send(other.with_modifiers(Modifiers::CTRL));
    assert_eq!(h.cam.mode(), NavigationMode::Selection);
    assert_eq!(
        h.viewer.forwarded.last(),
        Some(&other.with_modifiers(Modifiers::CTRL))
    );
}

#[test]
fn usable_as_a_navigation_style() {
    let mut cam = ExaminerCam::default();
    let mut camera = ViewCamera::default();
    let mut viewer = RecordingViewer::default();
    let style: &mut dyn NavigationStyle = &mut cam;

    assert_eq!(style.name(), "Examiner");
    assert!(style.mouse_buttons(NavigationMode::Panning).is_some());
    assert!(style.mouse_buttons(NavigationMode::Seek).is_none());
    style.process_event(&press(MouseButton::Left, CENTER, 0), &mut camera, &mut viewer);
    assert_eq!(style.mode(), NavigationMode::Dragging);
    assert!(viewer.viewing);
}

/// Drag to the right and let go while still moving.
fn flick(h: &mut Harness) {
    h.send(press(MouseButton::Left, CENTER, 0));
    for (i, x) in [420.0, 440.0, 460.0].into_iter().enumerate() {
        h.send(NavEvent::moved(Vec2::new(x, 300.0), ms(10 + i as u64 * 10)));
    }
    h.send(release(MouseButton::Left, Vec2::new(460.0, 300.0), 35));
    assert_eq!(h.cam.mode(), NavigationMode::Spinning);
}

#[test]
fn keyboard_zoom_during_secondary_press_suppresses_menu() {
    let mut h = Harness::new();

    h.send(press(MouseButton::Right, CENTER, 0));
    h.send(key(KeyCode::PageUp));
    assert!(h.camera.focal_distance < 10.0);
    h.send(release(MouseButton::Right, CENTER, 50));

    assert!(h.viewer.menus.is_empty());
}

#[test]
fn recenter_animation_counts_as_camera_motion() {
    let mut h = Harness::new();
    h.viewer.pick = Some(Vec3::new(1.0, 1.0, 0.0));
    h.send(press(MouseButton::Middle, CENTER, 0));
    h.send(release(MouseButton::Middle, CENTER, 50));
    assert!(h.cam.is_animating());

    h.send(press(MouseButton::Right, CENTER, 100));
    assert!(h.tick(50));
    h.send(release(MouseButton::Right, CENTER, 150));

    assert!(h.viewer.menus.is_empty());
}

#[test]
fn key_release_stops_spin() {
    let mut h = Harness::new();
    flick(&mut h);

    h.send(NavEvent::key(
        KeyCode::KeyA,
        ButtonState::Released,
        CENTER,
        ms(100),
    ));

    assert_eq!(h.cam.mode(), NavigationMode::Idle);
    assert!(!h.cam.is_animating());
    let before = h.camera.clone();
    assert!(!h.tick(100));
    assert_eq!(h.camera, before);
}

#[test]
fn stray_button_release_stops_spin() {
    let mut h = Harness::new();
    flick(&mut h);

    h.send(release(MouseButton::Middle, CENTER, 100));

    assert_eq!(h.cam.mode(), NavigationMode::Idle);
    assert!(h.cam.state().spin.is_none());
}

#[test]
fn stray_primary_release_while_editing_ends_spin_quietly() {
    let mut h = Harness::new();
    flick(&mut h);
    h.viewer.editing = true;

    assert!(h.send(release(MouseButton::Left, CENTER, 100)));

    assert_eq!(h.cam.mode(), NavigationMode::Idle);
    assert!(h.viewer.clicks.is_empty());
    assert!(h.viewer.forwarded.is_empty());
}

#[test]
fn stop_animating_halts_spin() {
    let mut h = Harness::new();
    flick(&mut h);

    h.cam.stop_animating();

    assert_eq!(h.cam.mode(), NavigationMode::Idle);
    assert!(!h.cam.is_animating());
    let before = h.camera.clone();
    assert!(!h.tick(100));
    assert_eq!(h.camera, before);
}

#[test]
fn shift_click_while_waiting_to_seek_seeks() {
    let mut h = Harness::new();
    h.viewer.pick = Some(Vec3::new(0.0, 0.0, -2.0));

    h.send(key(KeyCode::KeyS));
    assert!(h.send(press(MouseButton::Left, CENTER, 0).with_modifiers(Modifiers::SHIFT)));

    assert_eq!(h.cam.mode(), NavigationMode::Seek);
    assert!(h.cam.is_animating());
}

#[test]
fn dragging_cancels_recenter_animation() {
    let mut h = Harness::new();
    h.viewer.pick = Some(Vec3::new(1.0, 1.0, 0.0));

    h.send(press(MouseButton::Middle, CENTER, 0));
    h.send(release(MouseButton::Middle, CENTER, 50));
    assert!(h.cam.is_animating());
    h.tick(50);

    h.send(press(MouseButton::Left, CENTER, 100));
    assert_eq!(h.cam.mode(), NavigationMode::Dragging);
    assert!(!h.cam.is_animating());
    let before = h.camera.clone();
    assert!(!h.tick(100));
    assert_eq!(h.camera, before);
}

#[test]
fn empty_viewport_leaves_camera_alone() {
    let mut h = Harness::new();
    h.camera.viewport = Vec2::ZERO;
    let before = h.camera.clone();

    // Orbit.
    h.send(press(MouseButton::Left, CENTER, 0));
    h.send(NavEvent::moved(CENTER + Vec2::new(40.0, 10.0), ms(10)));
    h.send(release(MouseButton::Left, CENTER + Vec2::new(40.0, 10.0), 20));
    // Pan.
    h.send(press(MouseButton::Middle, CENTER, 100));
    h.send(NavEvent::moved(CENTER + Vec2::new(40.0, 0.0), ms(110)));
    h.send(release(MouseButton::Middle, CENTER, 120));
    // Chord zoom.
    h.send(press(MouseButton::Left, CENTER, 200));
    h.send(press(MouseButton::Middle, CENTER, 210));
    h.send(NavEvent::moved(CENTER - Vec2::new(0.0, 40.0), ms(220)));
    h.send(release(MouseButton::Middle, CENTER, 230));
    h.send(release(MouseButton::Left, CENTER, 240));
    // Keys.
    h.send(key(KeyCode::PageUp));
    h.send(key(KeyCode::ArrowLeft));

    assert_eq!(h.camera, before);
    assert_eq!(h.cam.mode(), NavigationMode::Idle);
}

#[test]
fn engaged_only_while_buttons_drive_the_camera() {
    let mut h = Harness::new();
    assert!(!h.cam.is_engaged());

    h.send(press(MouseButton::Left, CENTER, 0));
    assert!(h.cam.is_engaged());
    for (i, x) in [420.0, 440.0, 460.0].into_iter().enumerate() {
        h.send(NavEvent::moved(Vec2::new(x, 300.0), ms(10 + i as u64 * 10)));
    }
    h.send(release(MouseButton::Left, Vec2::new(460.0, 300.0), 35));
    assert_eq!(h.cam.mode(), NavigationMode::Spinning);
    assert!(!h.cam.is_engaged());

    h.send(key(KeyCode::ControlLeft).with_modifiers(Modifiers::CTRL));
    assert_eq!(h.cam.mode(), NavigationMode::Selection);
    assert!(!h.cam.is_engaged());
}
