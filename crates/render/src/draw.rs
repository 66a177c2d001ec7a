use glam::{Mat4, Vec3};
use skate_common::{Facade, ObstacleKind, Side};
use skate_kernel::GameState;
use std::f32::consts::FRAC_PI_2;

/// Mesh the external renderer should draw. Figures carry their animation
/// parameters so the renderer can pose limbs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Road,
    Sidewalk,
    Building,
    Skater { bend_angle: f32 },
    Bench,
    JumpBar,
    Cone,
    Officer { wave_angle: f32 },
}

/// Surface the external renderer should apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    Asphalt,
    Pavement,
    OfficeFacade,
    BrickFacade,
    GlassFacade,
    TowerFacade,
    BenchWood,
    JumpBarWood,
    ConeOrange,
    SkaterCloth,
    PoliceCloth,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub shape: Shape,
    pub transform: Mat4,
    pub material: Material,
}

/// The host renderer's draw entry point.
pub trait DrawSink {
    fn draw(&mut self, command: &DrawCommand);
}

impl DrawSink for Vec<DrawCommand> {
    fn draw(&mut self, command: &DrawCommand) {
        self.push(*command);
    }
}

const SIDEWALK_TILES: usize = 13;

fn facade_material(facade: Facade) -> Material {
    match facade {
        Facade::Office => Material::OfficeFacade,
        Facade::Brick => Material::BrickFacade,
        Facade::Glass => Material::GlassFacade,
        Facade::Tower => Material::TowerFacade,
    }
}

/// Benches stand the panel mesh upright; jump bars lie flat and wide.
fn obstacle_command(kind: ObstacleKind, base: Mat4) -> DrawCommand {
    match kind {
        ObstacleKind::Bench => DrawCommand {
            shape: Shape::Bench,
            transform: base
                * Mat4::from_rotation_x(FRAC_PI_2)
                * Mat4::from_scale(Vec3::new(0.8, 1.2, 1.2)),
            material: Material::BenchWood,
        },
        ObstacleKind::JumpBar => DrawCommand {
            shape: Shape::JumpBar,
            transform: base * Mat4::from_scale(Vec3::new(2.2, 1.2, 1.4)),
            material: Material::JumpBarWood,
        },
        ObstacleKind::Cone => DrawCommand {
            shape: Shape::Cone,
            transform: base,
            material: Material::ConeOrange,
        },
    }
}

/// Every draw command of one frame, in draw order.
pub fn build_draw_list(game: &GameState) -> Vec<DrawCommand> {
    let obstacles = game.obstacles().slots();
    let buildings_left = game.buildings(Side::Left).slots();
    let buildings_right = game.buildings(Side::Right).slots();
    let mut list = Vec::with_capacity(
        1 + 2 * SIDEWALK_TILES + buildings_left.len() + buildings_right.len() + 1 + obstacles.len() + 1,
    );

    list.push(DrawCommand {
        shape: Shape::Road,
        transform: Mat4::from_scale(Vec3::new(7.0, 1.0, 250.0)),
        material: Material::Asphalt,
    });

    for side in [Side::Left, Side::Right] {
        let base = Mat4::from_scale(Vec3::new(4.0, 1.0, 10.0));
        for tile in 0..SIDEWALK_TILES {
            let offset = Vec3::new(side.sign() * 2.8, 0.0, -2.0 * tile as f32);
            list.push(DrawCommand {
                shape: Shape::Sidewalk,
                transform: base * Mat4::from_translation(offset),
                material: Material::Pavement,
            });
        }
    }

    let building_scale = Mat4::from_scale(Vec3::from_array(game.config().buildings.scale));
    for slot in buildings_left.iter().chain(buildings_right) {
        list.push(DrawCommand {
            shape: Shape::Building,
            transform: slot.transform() * building_scale,
            material: facade_material(slot.kind),
        });
    }

    let player = game.player();
    list.push(DrawCommand {
        shape: Shape::Skater {
            bend_angle: player.pose().bend_angle,
        },
        transform: player.transform(),
        material: Material::SkaterCloth,
    });

    for slot in obstacles {
        list.push(obstacle_command(slot.kind, slot.transform()));
    }

    let officer = game.officer();
    list.push(DrawCommand {
        shape: Shape::Officer {
            wave_angle: officer.wave_angle(game.time()),
        },
        transform: officer.transform(),
        material: Material::PoliceCloth,
    });

    list
}

/// Build the frame's draw list and hand each command to `sink`.
pub fn emit_frame(game: &GameState, sink: &mut impl DrawSink) -> usize {
    let list = build_draw_list(game);
    for command in &list {
        sink.draw(command);
    }
    tracing::trace!(commands = list.len(), tick = game.tick(), "frame emitted");
    list.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use skate_common::{GameConfig, translation_of};

    fn game() -> GameState {
        GameState::new(GameConfig::default(), 42)
    }

    #[test]
    fn draw_order_is_fixed() {
        let list = build_draw_list(&game());
        // road + 26 sidewalk tiles + 100 buildings + player + 50 obstacles + officer
        assert_eq!(list.len(), 1 + 26 + 100 + 1 + 50 + 1);
        assert_eq!(list[0].shape, Shape::Road);
        assert!(list[1..27].iter().all(|c| c.shape == Shape::Sidewalk));
        assert!(list[27..127].iter().all(|c| c.shape == Shape::Building));
        assert!(matches!(list[127].shape, Shape::Skater { .. }));
        assert!(list[128..178].iter().all(|c| matches!(
            c.shape,
            Shape::Bench | Shape::JumpBar | Shape::Cone
        )));
        assert!(matches!(list[178].shape, Shape::Officer { .. }));
    }

    #[test]
    fn obstacle_commands_follow_kind() {
        let game = game();
        let list = build_draw_list(&game);
        for (slot, command) in game.obstacles().slots().iter().zip(&list[128..178]) {
            let expected = match slot.kind {
                ObstacleKind::Bench => (Shape::Bench, Material::BenchWood),
                ObstacleKind::JumpBar => (Shape::JumpBar, Material::JumpBarWood),
                ObstacleKind::Cone => (Shape::Cone, Material::ConeOrange),
            };
            assert_eq!((command.shape, command.material), expected);
            let pos = translation_of(&command.transform);
            assert!((pos - slot.position()).length() < 1e-4);
        }
    }

    #[test]
    fn bench_stands_upright_and_jump_bar_lies_wide() {
        let bench = obstacle_command(ObstacleKind::Bench, Mat4::IDENTITY);
        assert_eq!(bench.material, Material::BenchWood);
        // Rotated a quarter turn about x: local y maps onto world z.
        assert!(bench.transform.y_axis.y.abs() < 1e-5);
        assert!((bench.transform.y_axis.z - 1.2).abs() < 1e-5);

        let bar = obstacle_command(ObstacleKind::JumpBar, Mat4::IDENTITY);
        assert_eq!(bar.material, Material::JumpBarWood);
        assert!((bar.transform.x_axis.x - 2.2).abs() < 1e-5);
    }

    #[test]
    fn buildings_are_scaled_at_their_slot() {
        let game = game();
        let list = build_draw_list(&game);
        let first = game.buildings(Side::Left).slots()[0];
        let command = list[27];
        assert_eq!(command.material, facade_material(first.kind));
        assert_eq!(translation_of(&command.transform), first.position());
        assert!((command.transform.x_axis.x - 5.0).abs() < 1e-5);
        assert!((command.transform.z_axis.z - 6.0).abs() < 1e-5);
    }

    #[test]
    fn emit_frame_feeds_sink_in_order() {
        let game = game();
        let mut sink: Vec<DrawCommand> = Vec::new();
        let count = emit_frame(&game, &mut sink);
        assert_eq!(count, sink.len());
        assert_eq!(sink, build_draw_list(&game));
    }

    #[test]
    fn player_command_uses_controller_transform() {
        let game = game();
        let list = build_draw_list(&game);
        assert_eq!(list[127].transform, game.player().transform());
        assert_eq!(list[127].material, Material::SkaterCloth);
    }
}
