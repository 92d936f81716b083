//! Property-based tests for decoder and control invariants.

mod common;

use proptest::prelude::*;

use stlview_core::params::LEVEL_COUNT;
use stlview_core::stl::{self, HEADER_SIZE, RECORD_SIZE};
use stlview_core::{ControlPanel, DecodeError, Material, ParameterName, Renderer};

use common::{encode, encode_with_count, Face};

fn arb_face() -> impl Strategy<Value = Face> {
    prop::array::uniform3(prop::array::uniform3(-1.0e6f32..1.0e6))
}

fn arb_continuous() -> impl Strategy<Value = ParameterName> {
    prop::sample::select(vec![
        ParameterName::Opacity,
        ParameterName::Ambient,
        ParameterName::Diffuse,
        ParameterName::Roughness,
        ParameterName::Specular,
    ])
}

proptest! {
    #[test]
    fn vertex_count_is_three_per_triangle(faces in prop::collection::vec(arb_face(), 0..40)) {
        let mesh = stl::decode(&encode(&faces)).unwrap();
        prop_assert_eq!(mesh.triangle_count(), faces.len());
        prop_assert_eq!(mesh.vertex_count(), 3 * mesh.triangle_count());
        for (i, triangle) in mesh.triangles().iter().enumerate() {
            let base = 3 * i as u32;
            prop_assert_eq!(triangle.indices, [base, base + 1, base + 2]);
        }
    }

    #[test]
    fn trailing_bytes_never_change_the_mesh(
        faces in prop::collection::vec(arb_face(), 0..10),
        trailing in prop::collection::vec(any::<u8>(), 0..120),
    ) {
        let plain = encode(&faces);
        let mut padded = plain.clone();
        padded.extend_from_slice(&trailing);

        let a = stl::decode(&plain).unwrap();
        let b = stl::decode(&padded).unwrap();
        prop_assert_eq!(a.vertices(), b.vertices());
        prop_assert_eq!(a.triangles(), b.triangles());
    }

    #[test]
    fn any_prefix_fails_with_the_right_error(
        faces in prop::collection::vec(arb_face(), 1..10),
        cut in any::<prop::sample::Index>(),
    ) {
        let full = encode(&faces);
        let len = cut.index(full.len());
        match stl::decode(&full[..len]) {
            Err(DecodeError::Format { .. }) => prop_assert!(len < HEADER_SIZE + 4),
            Err(DecodeError::Truncated { triangle }) => {
                prop_assert!(len >= HEADER_SIZE + 4);
                prop_assert_eq!(triangle as usize, (len - HEADER_SIZE - 4) / RECORD_SIZE);
            }
            other => prop_assert!(false, "unexpected result {:?}", other.map(|m| m.triangle_count())),
        }
    }

    #[test]
    fn overdeclared_count_reports_first_missing(
        faces in prop::collection::vec(arb_face(), 0..10),
        extra in 1u32..1000,
    ) {
        let declared = faces.len() as u32 + extra;
        let err = stl::decode(&encode_with_count(&faces, declared)).unwrap_err();
        prop_assert_eq!(err, DecodeError::Truncated { triangle: faces.len() as u32 });
    }

    #[test]
    fn level_selection_stays_in_unit_interval(
        name in arb_continuous(),
        level in 0usize..LEVEL_COUNT,
    ) {
        let mut panel = ControlPanel::default();
        let value = panel.select(name, level).unwrap().value.as_f64().unwrap();
        prop_assert!((0.0..=1.0).contains(&value));
        prop_assert_eq!(value, level as f64 / 20.0);
        prop_assert_eq!(panel.parameters().level(name), Some(value));
    }

    #[test]
    fn invalid_level_leaves_panel_unchanged(
        name in arb_continuous(),
        level in LEVEL_COUNT..10_000usize,
    ) {
        let mut panel = ControlPanel::default();
        let before = panel.parameters().clone();
        prop_assert!(panel.select(name, level).is_err());
        prop_assert_eq!(panel.parameters(), &before);
    }

    #[test]
    fn reapplying_updates_is_idempotent(
        selections in prop::collection::vec((arb_continuous(), 0usize..LEVEL_COUNT), 1..20),
    ) {
        struct State(Material);
        impl Renderer for State {
            fn load_mesh(&mut self, _mesh: std::sync::Arc<stlview_core::Mesh>) {}
            fn apply_update(&mut self, update: &stlview_core::RenderUpdate) {
                self.0.apply(update);
            }
        }

        let mut panel = ControlPanel::default();
        let mut once = State(Material::default());
        let mut twice = State(Material::default());
        for (name, level) in selections {
            let update = panel.select(name, level).unwrap();
            once.apply_update(&update);
            twice.apply_update(&update);
            twice.apply_update(&update);
        }
        prop_assert_eq!(once.0, twice.0);
        prop_assert_eq!(once.0, Material::from(panel.parameters()));
    }
}
