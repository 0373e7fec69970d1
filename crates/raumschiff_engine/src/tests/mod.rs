//! Cross-module scenarios run against the recording device

use std::io::Cursor;

use crate::assets::ObjLoader;
use crate::config::{DemoConfig, InitialScreen};
use crate::input::InputSnapshot;
use crate::render::device::recording::{Call, RecordingDevice};
use crate::render::device::{BufferId, BufferTarget, BufferUsage, Primitive};
use crate::render::text::GlyphCache;
use crate::render::{check_errors, FrameRenderer, TransformState};
use crate::screen::{AppState, Screen, ScreenKind};

const QUAD_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3
f 1 3 4
";

#[test]
fn test_quad_import_upload_and_game_frame() {
    let mesh = ObjLoader::load_obj_from_reader("quad", &mut Cursor::new(QUAD_OBJ)).unwrap();
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
    assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));

    let mut device = RecordingDevice::new();
    let mut renderer =
        FrameRenderer::new(&mut device, &mesh, &DemoConfig::default(), GlyphCache::empty(48.0)).unwrap();
    assert!(device.calls.contains(&Call::BufferData {
        target: BufferTarget::Index,
        buffer: BufferId(3),
        len: 6 * 4,
        usage: BufferUsage::Static,
    }));

    device.clear_calls();
    renderer.render(&mut device, &Screen::Game(TransformState::default()));
    assert_eq!(
        device.draws().last(),
        Some(&&Call::DrawElements { primitive: Primitive::Triangles, count: 6 })
    );

    renderer.teardown(&mut device);
}

#[test]
fn test_frame_loop_from_start_to_game() {
    let mesh = ObjLoader::load_obj_from_reader("quad", &mut Cursor::new(QUAD_OBJ)).unwrap();
    let config = DemoConfig::default();
    let mut device = RecordingDevice::new();
    let renderer = FrameRenderer::new(&mut device, &mesh, &config, GlyphCache::empty(48.0)).unwrap();

    let screen = Screen::initial(InitialScreen::Start, String::new(), config.text.reveal_interval);
    let mut state = AppState::new(screen, config.controls);
    let frames = [
        InputSnapshot::default(),
        InputSnapshot::confirm(),
        InputSnapshot { down: true, ..InputSnapshot::default() },
        InputSnapshot { close: true, ..InputSnapshot::default() },
    ];

    let mut kinds = Vec::new();
    for input in &frames {
        state = state.update(input, 1.0 / 60.0);
        device.clear_calls();
        renderer.render(&mut device, &state.screen);
        assert_eq!(check_errors(&mut device, "frame"), 0);
        kinds.push(state.screen.kind());
    }

    assert_eq!(kinds, [ScreenKind::Start, ScreenKind::Game, ScreenKind::Game, ScreenKind::Game]);
    assert!(state.should_close);
    let Screen::Game(transform) = state.screen else {
        panic!("expected the game screen");
    };
    assert!((transform.translation.x - 0.05).abs() < 1e-6);
}
