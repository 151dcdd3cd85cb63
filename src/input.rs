//! Feeds Bevy input to navigation controllers, and ticks them every frame.
//!
//! Each frame, [`dispatch_input`] turns window input into [`NavEvent`]s and hands them to the
//! controller whose viewport is under the cursor. Picking comes from [`bevy_picking`]'s
//! [`HoverMap`], so any picking backend works. Events navigation leaves unconsumed come back out as
//! [`ForwardedInput`], selection clicks as [`ViewportClick`] and context menu requests as
//! [`ContextMenuRequest`].

use std::{marker::PhantomData, time::Duration};

use bevy_app::prelude::*;
use bevy_ecs::{
    component::Mutable,
    entity::{ContainsEntity, EntityHashMap, EntityHashSet},
    prelude::*,
    system::SystemParam,
};
use bevy_input::{keyboard::KeyCode, mouse::MouseScrollUnit, ButtonInput, InputSystem};
use bevy_log::prelude::*;
use bevy_math::prelude::*;
use bevy_picking::{hover::HoverMap, pointer::PointerId, PickSet};
use bevy_reflect::prelude::*;
use bevy_render::{camera::NormalizedRenderTarget, prelude::*};
use bevy_time::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::{PrimaryWindow, RequestRedraw, Window, WindowEvent};

use crate::controller::{
    camera::CameraAdapter,
    event::{Modifiers, NavEvent, NavEventKind},
    rig::{CameraRig, FocalDistance},
    viewer::{NavigationStyle, Viewer},
};

/// Pixels per line when converting pixel scroll deltas to lines.
const PIXELS_PER_LINE: f32 = 20.0;

/// Drives every camera with an `S` component from Bevy input. See the [module](self) docs.
pub struct NavigationPlugin<S>(PhantomData<S>);

impl<S> Default for NavigationPlugin<S> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<S: NavigationStyle + Component<Mutability = Mutable>> Plugin for NavigationPlugin<S> {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerContext>()
            .add_event::<ForwardedInput>()
            .add_event::<ContextMenuRequest>()
            .add_event::<ViewportClick>()
            .add_systems(
                PreUpdate,
                (dispatch_input::<S>, tick_cameras::<S>)
                    .chain()
                    .in_set(NavigationSystems)
                    .after(InputSystem)
                    .after(PickSet::Last),
            )
            .register_type::<ViewerContext>()
            .register_type::<FocalDistance>()
            .register_type::<ForegroundContent>();
    }
}

/// Input dispatch and ticking of navigation controllers, in [`PreUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, SystemSet)]
pub struct NavigationSystems;

/// Host state the controllers consult, shared by all cameras.
#[derive(Debug, Clone, Resource, Reflect)]
pub struct ViewerContext {
    /// The application is editing an object. Selections then survive mode changes, and unconsumed
    /// events are forwarded.
    pub editing: bool,
    /// The viewer is in viewing mode. Managed by the controllers.
    pub viewing: bool,
    /// Allow [`ContextMenuRequest`]s.
    pub popup_menu_enabled: bool,
    /// A press and release closer together than this is a click.
    pub double_click_interval: Duration,
}

impl Default for ViewerContext {
    fn default() -> Self {
        Self {
            editing: false,
            viewing: false,
            popup_menu_enabled: true,
            double_click_interval: Duration::from_millis(400),
        }
    }
}

/// Marks entities that take pointer input before navigation does, like draggers and gizmo
/// handles. A press over such an entity is left to it until every button is released.
#[derive(Debug, Default, Clone, Copy, Component, Reflect)]
pub struct ForegroundContent;

/// An input event navigation handed back to the application.
#[derive(Debug, Clone, Event)]
pub struct ForwardedInput {
    /// The camera the event was delivered to.
    pub camera: Entity,
    /// The event itself.
    pub event: NavEvent,
}

/// The user asked for a context menu.
#[derive(Debug, Clone, Event)]
pub struct ContextMenuRequest {
    /// The camera whose viewport was clicked.
    pub camera: Entity,
    /// Where to open the menu, in logical viewport pixels.
    pub position: Vec2,
}

/// A primary button event that navigation had no use for, typically a selection click.
#[derive(Debug, Clone, Event)]
pub struct ViewportClick {
    /// The camera whose viewport was clicked.
    pub camera: Entity,
    /// The button event.
    pub event: NavEvent,
    /// The nearest entity under the pointer.
    pub hit: Option<Entity>,
}

#[derive(SystemParam)]
pub struct WindowInput<'w, 's> {
    events: EventReader<'w, 's, WindowEvent>,
    windows: Query<'w, 's, &'static Window>,
    primary: Query<'w, 's, Entity, With<PrimaryWindow>>,
}

#[derive(SystemParam)]
pub struct ViewerOutput<'w> {
    forwarded: EventWriter<'w, ForwardedInput>,
    menus: EventWriter<'w, ContextMenuRequest>,
    clicks: EventWriter<'w, ViewportClick>,
}

impl ViewerOutput<'_> {
    fn send(&mut self, viewer: BevyViewer) {
        self.forwarded.write_batch(viewer.forwarded);
        self.menus.write_batch(viewer.menus);
        self.clicks.write_batch(viewer.clicks);
    }
}

/// One window event, before it is routed to a camera.
#[derive(Debug, Clone, PartialEq)]
struct PendingEvent {
    window: Entity,
    kind: NavEventKind,
    /// Cursor position in logical window pixels, if the cursor is in the window.
    cursor: Option<Vec2>,
    modifiers: Modifiers,
}

/// Keys and cursor positions as of the window event being translated. Kept by
/// [`dispatch_input`] between frames.
#[derive(Default)]
pub struct InputTracker {
    keys: ButtonInput<KeyCode>,
    cursors: EntityHashMap<Vec2>,
}

impl InputTracker {
    fn modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self
                .keys
                .any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
            shift: self
                .keys
                .any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
        }
    }
}

/// A camera that can receive input this frame.
#[derive(Clone, Copy)]
struct Target {
    camera: Entity,
    window: Entity,
    viewport: Rect,
    order: isize,
    engaged: bool,
}

/// Translate this frame's window input into [`NavEvent`]s and let the navigation controllers
/// handle them.
pub fn dispatch_input<S: NavigationStyle + Component<Mutability = Mutable>>(
    mut input: WindowInput,
    mut output: ViewerOutput,
    mut cameras: Query<(
        Entity,
        &Camera,
        &mut S,
        &mut Transform,
        &mut Projection,
        &mut FocalDistance,
    )>,
    hover_map: Option<Res<HoverMap>>,
    foreground: Query<(), With<ForegroundContent>>,
    mut context: ResMut<ViewerContext>,
    time: Res<Time<Real>>,
    mut grabbed: Local<EntityHashSet>,
    mut last_position: Local<EntityHashMap<Vec2>>,
    mut tracker: Local<InputTracker>,
) {
    let WindowInput {
        events,
        windows,
        primary,
    } = &mut input;
    let events = collect_window_events(events.read(), &mut tracker, |window| {
        windows.get(window).ok().and_then(Window::cursor_position)
    });
    if events.is_empty() {
        return;
    }

    let primary = primary.single().ok();
    let mut targets: Vec<Target> = cameras
        .iter()
        .filter(|(_, camera, ..)| camera.is_active)
        .filter_map(|(entity, camera, style, ..)| {
            let Some(NormalizedRenderTarget::Window(window)) = camera.target.normalize(primary)
            else {
                return None;
            };
            Some(Target {
                camera: entity,
                window: window.entity(),
                viewport: camera.logical_viewport_rect()?,
                order: camera.order,
                engaged: style.is_engaged(),
            })
        })
        .collect();

    let now = time.elapsed();

    for pending in events {
        let Some(target) = route(&targets, &pending).copied() else {
            continue;
        };
        let position = match pending.cursor {
            Some(cursor) => cursor - target.viewport.min,
            None => last_position
                .get(&target.camera)
                .copied()
                .unwrap_or_else(|| target.viewport.half_size()),
        };
        last_position.insert(target.camera, position);
        let event = NavEvent {
            kind: pending.kind,
            position,
            modifiers: pending.modifiers,
            time: now,
        };

        let Ok((entity, _, mut style, mut transform, mut projection, mut focal)) =
            cameras.get_mut(target.camera)
        else {
            continue;
        };
        let hits = hover_map
            .as_deref()
            .map(|map| nearest_hits(map, entity, &foreground))
            .unwrap_or_default();
        let mut viewer = BevyViewer {
            camera: entity,
            context: &mut context,
            hits,
            grabbed: grabbed.contains(&entity),
            forwarded: Vec::new(),
            menus: Vec::new(),
            clicks: Vec::new(),
        };
        let handled = drive(
            target.viewport.size(),
            &mut transform,
            &mut projection,
            &mut focal,
            |rig| style.process_event(&event, rig, &mut viewer),
        );
        if handled.is_none() {
            warn_once!("Custom projections are not supported.");
        }
        if viewer.grabbed {
            grabbed.insert(entity);
        } else {
            grabbed.remove(&entity);
        }
        output.send(viewer);
        let engaged = style.is_engaged();
        if let Some(target) = targets.iter_mut().find(|t| t.camera == entity) {
            target.engaged = engaged;
        }
    }
}

/// Advance spins and animations of every navigation controller.
pub fn tick_cameras<S: NavigationStyle + Component<Mutability = Mutable>>(
    mut cameras: Query<(
        &Camera,
        &mut S,
        &mut Transform,
        &mut Projection,
        &mut FocalDistance,
    )>,
    time: Res<Time>,
    mut redraw: EventWriter<RequestRedraw>,
) {
    let delta = time.delta();
    for (camera, mut style, mut transform, mut projection, mut focal) in &mut cameras {
        if !style.is_animating() {
            continue;
        }
        let Some(viewport) = camera.logical_viewport_size() else {
            continue;
        };
        match drive(viewport, &mut transform, &mut projection, &mut focal, |rig| {
            style.tick(delta, rig)
        }) {
            Some(true) => {
                redraw.write(RequestRedraw);
            }
            Some(false) => {}
            None => warn_once!("Custom projections are not supported."),
        }
    }
}

/// Run `f` against the camera components, only flagging the components it actually changed.
pub(crate) fn drive<R>(
    viewport: Vec2,
    transform: &mut Mut<Transform>,
    projection: &mut Mut<Projection>,
    focal: &mut Mut<FocalDistance>,
    f: impl FnOnce(&mut dyn CameraAdapter) -> R,
) -> Option<R> {
    let (old_transform, old_focal) = (**transform, **focal);
    let mut rig = CameraRig::new(
        transform.bypass_change_detection(),
        projection.bypass_change_detection(),
        focal.bypass_change_detection(),
        viewport,
    )?;
    let old_volume = rig.view_volume();
    let result = f(&mut rig);
    let new_volume = rig.view_volume();

    if **transform != old_transform {
        transform.set_changed();
    }
    if **focal != old_focal {
        focal.set_changed();
    }
    if new_volume != old_volume {
        projection.set_changed();
    }
    Some(result)
}

/// Translate window events into pending navigation events, in the order they arrived.
/// `window_cursor` supplies the cursor position of windows the events haven't moved the cursor
/// in yet.
fn collect_window_events<'a>(
    events: impl IntoIterator<Item = &'a WindowEvent>,
    tracker: &mut InputTracker,
    window_cursor: impl Fn(Entity) -> Option<Vec2>,
) -> Vec<PendingEvent> {
    let mut pending = Vec::new();
    for event in events {
        let (window, kind) = match event {
            WindowEvent::KeyboardInput(key) => {
                if key.state.is_pressed() {
                    tracker.keys.press(key.key_code);
                } else {
                    tracker.keys.release(key.key_code);
                }
                let kind = NavEventKind::Keyboard {
                    key: key.key_code,
                    state: key.state,
                };
                (key.window, kind)
            }
            WindowEvent::KeyboardFocusLost(_) => {
                tracker.keys.release_all();
                continue;
            }
            WindowEvent::CursorMoved(moved) => {
                tracker.cursors.insert(moved.window, moved.position);
                (moved.window, NavEventKind::PointerMoved)
            }
            WindowEvent::CursorLeft(left) => {
                tracker.cursors.remove(&left.window);
                continue;
            }
            WindowEvent::MouseButtonInput(button) => {
                let kind = NavEventKind::Button {
                    button: button.button,
                    state: button.state,
                };
                (button.window, kind)
            }
            WindowEvent::MouseWheel(wheel) => {
                let delta = Vec2::new(wheel.x, wheel.y);
                let lines = match wheel.unit {
                    MouseScrollUnit::Line => delta,
                    MouseScrollUnit::Pixel => delta / PIXELS_PER_LINE,
                };
                (wheel.window, NavEventKind::Wheel { delta: lines })
            }
            _ => continue,
        };
        let cursor = tracker
            .cursors
            .get(&window)
            .copied()
            .or_else(|| window_cursor(window));
        pending.push(PendingEvent {
            window,
            kind,
            cursor,
            modifiers: tracker.modifiers(),
        });
    }
    pending
}

/// The camera that should see `event`: one that is in the middle of an interaction, otherwise the
/// topmost one under the cursor.
fn route<'a>(targets: &'a [Target], event: &PendingEvent) -> Option<&'a Target> {
    let window = event.window;
    let in_window = move || targets.iter().filter(move |t| t.window == window);
    in_window().find(|t| t.engaged).or_else(|| {
        let cursor = event.cursor?;
        in_window()
            .filter(|t| t.viewport.contains(cursor))
            .max_by_key(|t| t.order)
    })
}

/// Something under the mouse pointer.
struct Hit {
    entity: Entity,
    depth: f32,
    position: Option<Vec3>,
    foreground: bool,
}

/// Hits from the mouse pointer seen by `camera`, nearest first.
fn nearest_hits(
    map: &HoverMap,
    camera: Entity,
    foreground: &Query<(), With<ForegroundContent>>,
) -> Vec<Hit> {
    let mut hits: Vec<Hit> = map
        .get(&PointerId::Mouse)
        .into_iter()
        .flat_map(|hits| hits.iter())
        .filter(|(_, hit)| hit.camera == camera)
        .map(|(entity, hit)| Hit {
            entity: *entity,
            depth: hit.depth,
            position: hit.position,
            foreground: foreground.contains(*entity),
        })
        .collect();
    hits.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    hits
}

/// The [`Viewer`] a Bevy app presents to a navigation controller while one event is handled.
/// Outgoing events are collected and written once the controller is done.
struct BevyViewer<'a> {
    camera: Entity,
    context: &'a mut ViewerContext,
    hits: Vec<Hit>,
    grabbed: bool,
    forwarded: Vec<ForwardedInput>,
    menus: Vec<ContextMenuRequest>,
    clicks: Vec<ViewportClick>,
}

impl Viewer for BevyViewer<'_> {
    fn is_editing(&self) -> bool {
        self.context.editing
    }

    fn is_viewing(&self) -> bool {
        self.context.viewing
    }

    fn set_viewing(&mut self, viewing: bool) {
        self.context.viewing = viewing;
    }

    fn offer_to_foreground(&mut self, event: &NavEvent) -> bool {
        if self.grabbed {
            if let NavEventKind::Button { state, .. } = event.kind {
                self.grabbed = state.is_pressed();
            }
            return true;
        }
        let over_foreground = self.hits.first().is_some_and(|hit| hit.foreground);
        let press = matches!(event.kind, NavEventKind::Button { .. }) && event.kind.is_press();
        self.grabbed = over_foreground && press;
        self.grabbed
    }

    fn forward(&mut self, event: &NavEvent) -> bool {
        self.forwarded.push(ForwardedInput {
            camera: self.camera,
            event: *event,
        });
        false
    }

    fn click(&mut self, event: &NavEvent) -> bool {
        self.clicks.push(ViewportClick {
            camera: self.camera,
            event: *event,
            hit: self.hits.first().map(|hit| hit.entity),
        });
        false
    }

    fn popup_menu_enabled(&self) -> bool {
        self.context.popup_menu_enabled
    }

    fn open_popup_menu(&mut self, position: Vec2) {
        self.menus.push(ContextMenuRequest {
            camera: self.camera,
            position,
        });
    }

    /// Hover data is only available at the pointer, so `position` is assumed to be the pointer
    /// position.
    fn pick(&self, _camera: &dyn CameraAdapter, _position: Vec2) -> Option<Vec3> {
        self.hits.iter().find_map(|hit| hit.position)
    }

    fn double_click_interval(&self) -> Duration {
        self.context.double_click_interval
    }
}
