use std::fs;

use tempfile::{TempDir, tempdir};

use crate::config::CropConfig;
use crate::host::{Dims, Layer, LayerId, ShapesLayer, Viewer};
use crate::model::{PropertySchema, Scale};
use crate::notice::NoticeLevel;

use super::export::{CropRow, render_csv, round_to};
use super::{CroppingController, CroppingError, CroppingModel, CroppingPanel, column_names, row_label};

struct Fixture {
    viewer: Viewer,
    controller: CroppingController,
    layer: LayerId,
    dir: TempDir,
}

impl Fixture {
    fn new(shape: &[usize], scale: Vec<f64>) -> Self {
        let ndim = shape.len();
        let mut viewer = Viewer::new(Dims::from_shape(shape));
        let layer = viewer.add_layer(Layer::shapes(
            "Cropping Box",
            ShapesLayer::new(ndim, PropertySchema::for_ndim(ndim)),
        ));
        let dir = tempdir().expect("tempdir");
        let config = CropConfig::default();
        let model = CroppingModel::new(
            &mut viewer,
            layer,
            Scale::new(scale).expect("scale"),
            dir.path().to_path_buf(),
            &config,
        )
        .expect("model");
        let panel = CroppingPanel::new(dir.path(), &config);
        let controller = CroppingController::new(model, panel, &mut viewer).expect("controller");
        let mut fixture = Self {
            viewer,
            controller,
            layer,
            dir,
        };
        fixture.pump();
        fixture
    }

    fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.viewer.poll_event() {
            self.controller
                .handle_event(&mut self.viewer, event)
                .expect("event");
            handled += 1;
            assert!(handled < 100, "viewer events keep cascading");
        }
        handled
    }

    fn draw(&mut self, start: &[f64], end: &[f64]) -> usize {
        let index = self
            .viewer
            .add_rectangle(self.layer, start, end)
            .expect("rectangle");
        self.pump();
        index
    }

    fn select(&mut self, indices: &[usize]) {
        self.viewer
            .select_shapes(self.layer, indices.iter().copied())
            .expect("select");
    }

    fn scroll_to(&mut self, axis: usize, step: usize) {
        self.viewer.set_current_step(axis, step).expect("step");
        self.pump();
    }

    fn model(&self) -> &CroppingModel {
        self.controller.model()
    }

    fn starts(&self) -> Vec<Option<f64>> {
        self.viewer
            .shapes(self.layer)
            .expect("shapes")
            .properties()
            .iter()
            .map(|attributes| attributes.scroll_start)
            .collect()
    }
}

#[test]
fn new_boxes_get_axis_defaults() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![2.0, 1.0, 1.0]);
    fixture.draw(&[0.0, 10.0, 5.0], &[0.0, 20.0, 15.0]);

    let layer = fixture.viewer.shapes(fixture.layer).expect("shapes");
    let attributes = &layer.properties()[0];
    assert_eq!(attributes.id, "0");
    assert_eq!(attributes.track_axis, Some(0));
    assert_eq!(attributes.scroll_start, Some(0.0));
    assert_eq!(attributes.scroll_end, Some(9.0));
    assert_eq!(layer.labels(), vec!["0".to_string()]);
    assert_eq!(
        fixture.controller.panel().roi_labels(),
        &["ROI 00: Z start=0.0, Z end=9.0".to_string()]
    );
}

#[test]
fn unset_range_reads_as_axis_extent() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![2.0, 1.0, 1.0]);
    fixture
        .viewer
        .add_rectangle(fixture.layer, &[0.0, 1.0, 1.0], &[0.0, 5.0, 5.0])
        .expect("rectangle");

    // event not delivered yet: the slot does not exist and reads as unset
    let model = fixture.model();
    assert!(fixture.viewer.shapes(fixture.layer).expect("shapes").properties().is_empty());
    assert_eq!(model.get_track_axis(&fixture.viewer, 0).expect("axis"), Some(0));
    assert_eq!(model.get_scroll_start(&fixture.viewer, 0).expect("start"), Some(0.0));
    assert_eq!(model.get_scroll_end(&fixture.viewer, 0).expect("end"), Some(9.0));
    assert_eq!(
        model.get_scroll_end_physical(&fixture.viewer, 0).expect("end"),
        Some(18.0)
    );
}

#[test]
fn writes_by_index_require_synced_properties() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 1.0, 1.0]);
    fixture
        .viewer
        .add_rectangle(fixture.layer, &[0.0, 1.0, 1.0], &[0.0, 5.0, 5.0])
        .expect("rectangle");
    let model = fixture.controller.model().clone();
    assert!(matches!(
        model.set_scroll_start(&mut fixture.viewer, 0, 3.0),
        Err(CroppingError::PropertiesOutOfSync { index: 0, len: 0 })
    ));
    assert!(matches!(
        model.set_scroll_start(&mut fixture.viewer, 4, 3.0),
        Err(CroppingError::RoiIndex { index: 4, count: 1 })
    ));

    model.sync_properties(&mut fixture.viewer).expect("sync");
    model
        .set_scroll_start(&mut fixture.viewer, 0, 3.0)
        .expect("start");
    assert_eq!(model.get_scroll_start(&fixture.viewer, 0).expect("start"), Some(3.0));
}

#[test]
fn sync_properties_is_idempotent() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 1.0, 1.0]);
    fixture.draw(&[0.0, 10.0, 5.0], &[0.0, 20.0, 15.0]);
    fixture.draw(&[0.0, 30.0, 5.0], &[0.0, 40.0, 15.0]);
    let model = fixture.controller.model().clone();

    model.sync_properties(&mut fixture.viewer).expect("sync");
    let first = fixture.viewer.shapes(fixture.layer).expect("shapes").properties().to_vec();
    model.sync_properties(&mut fixture.viewer).expect("sync");
    let second = fixture.viewer.shapes(fixture.layer).expect("shapes").properties().to_vec();
    assert_eq!(first, second);
}

#[test]
fn property_table_tracks_box_count() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 1.0, 1.0]);
    for row in 0..4 {
        let top = 10.0 * row as f64;
        fixture.draw(&[0.0, top, 0.0], &[0.0, top + 5.0, 5.0]);
        let count = fixture.viewer.shapes(fixture.layer).expect("shapes").properties().len();
        assert_eq!(count, row + 1);
    }
    fixture.viewer.remove_shape(fixture.layer, 1).expect("remove");
    fixture.viewer.remove_shape(fixture.layer, 0).expect("remove");
    fixture.pump();
    let layer = fixture.viewer.shapes(fixture.layer).expect("shapes");
    assert_eq!(layer.len(), 2);
    assert_eq!(layer.properties().len(), 2);
    assert_eq!(fixture.controller.panel().roi_labels().len(), 2);
}

#[test]
fn removing_first_box_shifts_attributes_down() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 1.0, 1.0]);
    for row in 0..3 {
        let top = 10.0 * row as f64;
        fixture.draw(&[0.0, top, 0.0], &[0.0, top + 5.0, 5.0]);
    }
    for idx in 0..3 {
        fixture.select(&[idx]);
        fixture.scroll_to(0, idx + 1);
        let notice = fixture
            .controller
            .on_set_start(&mut fixture.viewer)
            .expect("set start");
        assert_eq!(notice.level, NoticeLevel::Info);
    }
    assert_eq!(fixture.starts(), vec![Some(1.0), Some(2.0), Some(3.0)]);

    fixture.viewer.remove_shape(fixture.layer, 0).expect("remove");
    fixture.pump();
    assert_eq!(fixture.starts(), vec![Some(2.0), Some(3.0)]);
    let ids = fixture
        .viewer
        .shapes(fixture.layer)
        .expect("shapes")
        .properties()
        .iter()
        .map(|attributes| attributes.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["0".to_string(), "1".to_string()]);
}

#[test]
fn single_selection_gate() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 1.0, 1.0]);
    fixture.draw(&[0.0, 0.0, 0.0], &[0.0, 5.0, 5.0]);
    fixture.draw(&[0.0, 10.0, 0.0], &[0.0, 15.0, 5.0]);

    let selected = |fixture: &Fixture| {
        fixture
            .model()
            .get_selected_single_roi_index(&fixture.viewer)
            .expect("selection")
    };
    assert_eq!(selected(&fixture), None);
    fixture.select(&[1]);
    assert_eq!(selected(&fixture), Some(1));
    fixture.select(&[0, 1]);
    assert_eq!(selected(&fixture), None);

    let before = fixture.starts();
    let notice = fixture
        .controller
        .on_set_end(&mut fixture.viewer)
        .expect("set end");
    assert!(notice.is_warning());
    assert_eq!(notice.message, "Select exactly one cropping box.");
    assert_eq!(fixture.starts(), before);
}

#[test]
fn cursor_moves_pin_tracked_boxes_without_cascading() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 1.0, 1.0]);
    fixture.draw(&[0.0, 10.0, 5.0], &[0.0, 20.0, 15.0]);
    fixture.select(&[0]);

    fixture.viewer.set_current_step(0, 4).expect("step");
    // the cursor event plus the geometry edit it causes
    assert_eq!(fixture.pump(), 2);
    let layer = fixture.viewer.shapes(fixture.layer).expect("shapes");
    assert!(layer.shape(0).expect("box").column(0).iter().all(|z| *z == 4.0));
    assert_eq!(layer.selected().iter().copied().collect::<Vec<_>>(), vec![0]);

    let model = fixture.controller.model().clone();
    fixture.controller.project_shapes(&mut fixture.viewer).expect("project");
    assert!(!fixture.viewer.has_pending_events());
    assert_eq!(model.box_extent(&fixture.viewer, 0, 1).expect("extent"), (10.0, 20.0));
}

#[test]
fn track_axis_is_captured_per_box() {
    let mut fixture = Fixture::new(&[10, 20, 30], vec![1.0, 1.0, 1.0]);
    fixture.draw(&[0.0, 10.0, 5.0], &[0.0, 15.0, 15.0]);

    fixture.viewer.set_order(vec![1, 0, 2]).expect("order");
    fixture.draw(&[2.0, 0.0, 3.0], &[6.0, 0.0, 9.0]);

    let model = fixture.controller.model().clone();
    assert_eq!(model.get_track_axis(&fixture.viewer, 0).expect("axis"), Some(0));
    assert_eq!(model.get_track_axis(&fixture.viewer, 1).expect("axis"), Some(1));
    assert_eq!(model.get_scroll_end(&fixture.viewer, 1).expect("end"), Some(19.0));
    assert_eq!(
        fixture.controller.panel().roi_labels()[1],
        "ROI 01: Y start=0.0, Y end=19.0"
    );

    fixture.scroll_to(1, 7);
    assert_eq!(model.box_extent(&fixture.viewer, 1, 1).expect("extent"), (7.0, 7.0));
    assert_eq!(model.box_extent(&fixture.viewer, 0, 1).expect("extent"), (10.0, 15.0));
}

#[test]
fn scaled_export_of_tracked_box() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![2.0, 1.0, 1.0]);
    fixture.draw(&[0.0, 10.0, 5.0], &[0.0, 20.0, 15.0]);
    fixture.select(&[0]);
    fixture.scroll_to(0, 3);
    fixture.controller.on_set_start(&mut fixture.viewer).expect("start");
    fixture.scroll_to(0, 8);
    fixture.controller.on_set_end(&mut fixture.viewer).expect("end");
    assert_eq!(
        fixture.controller.panel().roi_labels(),
        &["ROI 00: Z start=3.0, Z end=8.0".to_string()]
    );

    let out = fixture.dir.path().join("nested").join("rois.csv");
    fixture.controller.panel_mut().set_tag("  tissue ");
    fixture.controller.panel_mut().set_output_path(&out);
    let notice = fixture.controller.on_save(&mut fixture.viewer).expect("save");
    assert_eq!(notice.message, "ROI coordinates saved to rois.csv!");

    let written = fs::read_to_string(&out).expect("csv");
    assert_eq!(
        written,
        ",z_start,z_end,y_start,y_end,x_start,x_end\ntissue_roi_00,6.0,16.0,10.0,20.0,5.0,15.0\n"
    );
}

#[test]
fn reversed_endpoints_are_ordered_on_export() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 1.0, 1.0]);
    fixture.draw(&[0.0, 10.0, 5.0], &[0.0, 20.0, 15.0]);
    fixture.select(&[0]);
    fixture.scroll_to(0, 8);
    fixture.controller.on_set_start(&mut fixture.viewer).expect("start");
    fixture.scroll_to(0, 2);
    fixture.controller.on_set_end(&mut fixture.viewer).expect("end");

    let model = fixture.controller.model().clone();
    assert_eq!(model.get_scroll_start(&fixture.viewer, 0).expect("start"), Some(8.0));
    let rows = model.crop_rows(&fixture.viewer, "").expect("rows");
    assert_eq!(rows[0].label, "roi_00");
    assert_eq!(rows[0].ranges[0], (2.0, 8.0));
}

#[test]
fn exported_values_are_rounded_and_files_overwritten() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 0.1234567, 1.0]);
    fixture.draw(&[0.0, 10.0, 5.0], &[0.0, 20.0, 15.0]);
    let out = fixture.dir.path().join("rois.csv");
    fs::write(&out, "stale").expect("stale file");

    let model = fixture.controller.model().clone();
    let saved = model.save_csv(&fixture.viewer, &out, "").expect("save");
    assert_eq!(saved, out);
    let written = fs::read_to_string(&out).expect("csv");
    let row = written.lines().nth(1).expect("row");
    assert_eq!(row, "roi_00,0.0,9.0,1.235,2.469,5.0,15.0");
}

#[test]
fn save_rejects_empty_sessions_and_other_formats() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 1.0, 1.0]);
    let notice = fixture.controller.on_save(&mut fixture.viewer).expect("save");
    assert!(notice.is_warning());
    assert_eq!(notice.message, "No cropping box drawn!");

    fixture.draw(&[0.0, 10.0, 5.0], &[0.0, 20.0, 15.0]);
    let png = fixture.dir.path().join("rois.png");
    fixture.controller.panel_mut().set_output_path(&png);
    let notice = fixture.controller.on_save(&mut fixture.viewer).expect("save");
    assert!(notice.is_warning());
    assert_eq!(notice.message, "Only CSV saving is implemented for now.");
    assert!(!png.exists());

    let upper = fixture.dir.path().join("ROIS.CSV");
    fixture.controller.panel_mut().set_output_path(&upper);
    let notice = fixture.controller.on_save(&mut fixture.viewer).expect("save");
    assert!(!notice.is_warning());
    assert!(upper.exists());
}

#[test]
fn clearing_resets_boxes_and_labels() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 1.0, 1.0]);
    let notice = fixture.controller.on_clear_rois(&mut fixture.viewer).expect("clear");
    assert_eq!(notice.message, "ROI list cleared!");
    assert_eq!(notice.level, NoticeLevel::Info);

    fixture.draw(&[0.0, 10.0, 5.0], &[0.0, 20.0, 15.0]);
    fixture.select(&[0]);
    fixture.controller.on_clear_rois(&mut fixture.viewer).expect("clear");
    fixture.pump();
    let layer = fixture.viewer.shapes(fixture.layer).expect("shapes");
    assert!(layer.is_empty());
    assert!(layer.properties().is_empty());
    assert!(layer.selected().is_empty());
    assert!(fixture.controller.panel().roi_labels().is_empty());

    fixture.draw(&[0.0, 1.0, 1.0], &[0.0, 2.0, 2.0]);
    assert_eq!(fixture.controller.panel().roi_labels().len(), 1);
}

#[test]
fn flat_images_have_no_scroll_range() {
    let mut fixture = Fixture::new(&[64, 64], vec![0.5, 0.5]);
    fixture.draw(&[10.0, 5.0], &[20.0, 15.0]);
    assert_eq!(fixture.model().schema(), PropertySchema::IdOnly);
    assert_eq!(
        fixture.controller.panel().roi_labels(),
        &["ROI 00: Y 10-20, X 5-15".to_string()]
    );
    let attributes = &fixture.viewer.shapes(fixture.layer).expect("shapes").properties()[0];
    assert_eq!(attributes.track_axis, None);

    fixture.select(&[0]);
    let notice = fixture.controller.on_set_start(&mut fixture.viewer).expect("start");
    assert!(notice.is_warning());

    let out = fixture.dir.path().join("flat.csv");
    fixture.controller.panel_mut().set_output_path(&out);
    fixture.controller.on_save(&mut fixture.viewer).expect("save");
    assert_eq!(
        fs::read_to_string(&out).expect("csv"),
        ",y_start,y_end,x_start,x_end\nroi_00,5.0,10.0,2.5,7.5\n"
    );
}

#[test]
fn removed_layer_turns_actions_into_warnings() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 1.0, 1.0]);
    fixture.draw(&[0.0, 10.0, 5.0], &[0.0, 20.0, 15.0]);
    fixture.viewer.remove_layer(fixture.layer).expect("removed");
    fixture.pump();
    for notice in [
        fixture.controller.on_set_start(&mut fixture.viewer).expect("start"),
        fixture.controller.on_clear_rois(&mut fixture.viewer).expect("clear"),
        fixture.controller.on_save(&mut fixture.viewer).expect("save"),
    ] {
        assert!(notice.is_warning());
    }
}

#[test]
fn narrow_viewer_is_rejected() {
    let mut viewer = Viewer::new(Dims::from_shape(&[64, 64]));
    let layer = viewer.add_layer(Layer::shapes(
        "Cropping Box",
        ShapesLayer::new(3, PropertySchema::Tracked),
    ));
    let result = CroppingModel::new(
        &mut viewer,
        layer,
        Scale::ones(3),
        ".".into(),
        &CropConfig::default(),
    );
    assert!(matches!(
        result,
        Err(CroppingError::DimsMismatch {
            layer_ndim: 3,
            dims_ndim: 2
        })
    ));
}

#[test]
fn csv_naming() {
    assert_eq!(row_label("", 3), "roi_03");
    assert_eq!(row_label("tissue", 12), "tissue_roi_12");
    assert_eq!(row_label("t", 123), "t_roi_123");
    assert_eq!(
        column_names(4),
        vec![
            "axis_0_start",
            "axis_0_end",
            "z_start",
            "z_end",
            "y_start",
            "y_end",
            "x_start",
            "x_end"
        ]
    );
}

#[test]
fn tags_with_separators_are_quoted() {
    let mut fixture = Fixture::new(&[10, 64, 64], vec![1.0, 1.0, 1.0]);
    fixture.draw(&[0.0, 10.0, 5.0], &[0.0, 20.0, 15.0]);
    let out = fixture.dir.path().join("rois.csv");

    let model = fixture.controller.model().clone();
    model
        .save_csv(&fixture.viewer, &out, "liver, left")
        .expect("save");
    let written = fs::read_to_string(&out).expect("csv");
    let mut lines = written.lines();
    let header = lines.next().expect("header");
    let row = lines.next().expect("row");
    assert_eq!(row, "\"liver, left_roi_00\",0.0,9.0,10.0,20.0,5.0,15.0");
    let values = row
        .strip_prefix("\"liver, left_roi_00\"")
        .expect("quoted label");
    assert_eq!(
        header.split(',').count(),
        1 + values.split(',').skip(1).count()
    );

    let rows = [CropRow {
        label: "say \"hi\"\nthere".to_string(),
        ranges: vec![(1.0, 2.0), (3.0, 4.0)],
    }];
    assert_eq!(
        render_csv(2, &rows, 3),
        ",y_start,y_end,x_start,x_end\n\"say \"\"hi\"\"\nthere\",1.0,2.0,3.0,4.0\n"
    );
}

#[test]
fn oversized_precision_is_capped() {
    let capped = round_to(1.234_567_890_123_456, u32::MAX);
    assert!(capped.is_finite());
    assert_eq!(capped, round_to(1.234_567_890_123_456, 12));

    let rows = [CropRow {
        label: "roi_00".to_string(),
        ranges: vec![(0.5, 2.25), (1.0, 3.0)],
    }];
    assert_eq!(
        render_csv(2, &rows, u32::MAX),
        ",y_start,y_end,x_start,x_end\nroi_00,0.5,2.25,1.0,3.0\n"
    );
}
