//! ESP outline pass over remembered portals.
//!
//! Planning is separated from emission so the draw list can be inspected
//! without a renderer. Neither step touches the catalog mutably.

use portal_logger_core::{Aabb, BlockPos, DimensionId};

use crate::{BoxRenderer, PortalCatalog, PortalId, RenderSettings, Rgba, ShapeMode, WorldView};

/// Everything needed to draw one portal this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalDraw {
    /// Portal being drawn.
    pub portal: PortalId,
    /// Distance from the player, in blocks.
    pub distance: f64,
    /// World-space boxes making up the outline.
    pub boxes: Vec<Aabb>,
    /// Fill color after fading.
    pub side: Rgba,
    /// Edge color after fading.
    pub line: Rgba,
    /// Outline style.
    pub mode: ShapeMode,
}

/// Build the draw list for portals near `player_pos` in its dimension.
///
/// Portals further than the render distance are culled. Positions that no
/// longer hold a portal block are skipped.
pub fn plan_draws<W: WorldView + ?Sized>(
    catalog: &PortalCatalog,
    world: &W,
    player_pos: BlockPos,
    dimension: DimensionId,
    settings: &RenderSettings,
) -> Vec<PortalDraw> {
    if !settings.render_portals {
        return Vec::new();
    }

    let max_distance = f64::from(settings.render_distance);
    let mut draws = Vec::new();
    for record in catalog.in_dimension(dimension) {
        let pos = record.id.pos;
        let distance = player_pos.distance(pos);
        if distance > max_distance {
            continue;
        }

        let (mut side, mut line) = settings.colors_for(record.is_unused());
        if settings.fade_distance {
            let factor = 1.0 - distance / max_distance;
            side = side.faded(factor);
            line = line.faded(factor);
        }

        if !world.is_portal_block(pos) {
            continue;
        }
        let shape = world.outline_shape(pos);
        let boxes = if shape.is_empty() {
            vec![pos.offset_box(Aabb::full_block())]
        } else {
            shape.into_iter().map(|local| pos.offset_box(local)).collect()
        };

        draws.push(PortalDraw {
            portal: record.id,
            distance,
            boxes,
            side,
            line,
            mode: settings.shape_mode,
        });
    }
    draws
}

/// Hand a draw list to the host renderer.
pub fn emit_draws<R: BoxRenderer + ?Sized>(draws: &[PortalDraw], renderer: &mut R) {
    for draw in draws {
        for aabb in &draw.boxes {
            renderer.draw_box(*aabb, draw.side, draw.line, draw.mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayerSnapshot;
    use portal_logger_core::PortalAxis;
    use std::collections::BTreeSet;

    struct Portals(BTreeSet<BlockPos>);

    impl WorldView for Portals {
        fn player(&self) -> Option<PlayerSnapshot> {
            None
        }

        fn is_portal_block(&self, pos: BlockPos) -> bool {
            self.0.contains(&pos)
        }

        fn outline_shape(&self, pos: BlockPos) -> Vec<Aabb> {
            if pos.y < 0 {
                Vec::new()
            } else {
                vec![Aabb::portal_slab(PortalAxis::X)]
            }
        }
    }

    fn catalog_with(positions: &[BlockPos]) -> PortalCatalog {
        let mut catalog = PortalCatalog::new();
        for &pos in positions {
            catalog
                .get_or_create(PortalId::new(DimensionId::Overworld, pos), 0)
                .record_use(0);
        }
        catalog
    }

    #[test]
    fn far_portals_are_culled() {
        let near = BlockPos::new(32, 64, 0);
        let far = BlockPos::new(300, 64, 0);
        let catalog = catalog_with(&[near, far]);
        let world = Portals([near, far].into_iter().collect());

        let draws = plan_draws(
            &catalog,
            &world,
            BlockPos::new(0, 64, 0),
            DimensionId::Overworld,
            &RenderSettings::default(),
        );
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].portal.pos, near);
    }

    #[test]
    fn fade_scales_alpha_with_distance() {
        let pos = BlockPos::new(32, 64, 0);
        let catalog = catalog_with(&[pos]);
        let world = Portals([pos].into_iter().collect());
        let settings = RenderSettings::default();

        let draws = plan_draws(
            &catalog,
            &world,
            BlockPos::new(0, 64, 0),
            DimensionId::Overworld,
            &settings,
        );
        let draw = &draws[0];
        assert_eq!(draw.line.a, 127);
        assert_eq!(draw.side.a, 25);
        assert!(draw.line.a > 0 && draw.line.a < settings.line_color.a);
    }

    #[test]
    fn other_dimensions_and_missing_blocks_are_skipped() {
        let here = BlockPos::new(1, 64, 1);
        let gone = BlockPos::new(2, 64, 2);
        let mut catalog = catalog_with(&[here, gone]);
        catalog.get_or_create(PortalId::new(DimensionId::Nether, here), 0);
        let world = Portals([here].into_iter().collect());

        let draws = plan_draws(
            &catalog,
            &world,
            BlockPos::new(0, 64, 0),
            DimensionId::Overworld,
            &RenderSettings::default(),
        );
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].portal.dimension, DimensionId::Overworld);
        assert_eq!(draws[0].portal.pos, here);
    }

    #[test]
    fn shapes_are_offset_and_empty_shapes_fall_back() {
        let slab = BlockPos::new(4, 10, 4);
        let bare = BlockPos::new(4, -5, 4);
        let catalog = catalog_with(&[slab, bare]);
        let world = Portals([slab, bare].into_iter().collect());

        let draws = plan_draws(
            &catalog,
            &world,
            BlockPos::new(0, 0, 0),
            DimensionId::Overworld,
            &RenderSettings::default(),
        );
        let by_pos = |pos: BlockPos| draws.iter().find(|d| d.portal.pos == pos).unwrap();

        assert_eq!(
            by_pos(slab).boxes,
            vec![slab.offset_box(Aabb::portal_slab(PortalAxis::X))]
        );
        assert_eq!(by_pos(bare).boxes, vec![bare.offset_box(Aabb::full_block())]);
    }

    #[test]
    fn disabled_rendering_plans_nothing() {
        let pos = BlockPos::new(1, 1, 1);
        let catalog = catalog_with(&[pos]);
        let world = Portals([pos].into_iter().collect());
        let settings = RenderSettings {
            render_portals: false,
            ..RenderSettings::default()
        };
        assert!(plan_draws(&catalog, &world, pos, DimensionId::Overworld, &settings).is_empty());
    }

    #[test]
    fn unused_portals_use_alternate_colors() {
        let used = BlockPos::new(1, 0, 0);
        let unused = BlockPos::new(2, 0, 0);
        let mut catalog = catalog_with(&[used]);
        catalog.get_or_create(PortalId::new(DimensionId::Overworld, unused), 0);
        let world = Portals([used, unused].into_iter().collect());
        let settings = RenderSettings {
            highlight_unused: true,
            fade_distance: false,
            ..RenderSettings::default()
        };

        let draws = plan_draws(
            &catalog,
            &world,
            BlockPos::new(0, 0, 0),
            DimensionId::Overworld,
            &settings,
        );
        let unused_draw = draws.iter().find(|d| d.portal.pos == unused).unwrap();
        let used_draw = draws.iter().find(|d| d.portal.pos == used).unwrap();
        assert_eq!(unused_draw.side, settings.unused_side_color);
        assert_eq!(unused_draw.line, settings.unused_line_color);
        assert_eq!(used_draw.side, settings.side_color);
    }
}
