// src/ui/panel.rs
//! Editor panels
//!
//! The hierarchy, inspector and scene windows. Panels keep no state of
//! their own: selection, move mode and the inspector's text fields live on
//! the [`Editor`](crate::editor::Editor).

use imgui::{Condition, TreeNodeFlags, Ui};

use crate::behavior::BehaviorKind;
use crate::gfx::rendering::RenderBackend;
use crate::runtime::Runtime;
use crate::ui::forms::TRANSFORM_ROWS;

/// Pixels of indentation per hierarchy level.
const DEPTH_INDENT: f32 = 16.0;

/// Draws every editor window.
pub fn editor_panels<B: RenderBackend>(ui: &Ui, runtime: &mut Runtime<B>) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }
    hierarchy_panel(ui, runtime, display_size);
    inspector_panel(ui, runtime, display_size);
    scene_panel(ui, runtime);
}

/// Tree view of the scene with creation and move controls
pub fn hierarchy_panel<B: RenderBackend>(ui: &Ui, runtime: &mut Runtime<B>, display_size: [f32; 2]) {
    let panel_width = (display_size[0] * 0.2).clamp(220.0, 360.0);

    ui.window("Hierarchy")
        .size([panel_width, display_size[1] * 0.7], Condition::FirstUseEver)
        .position([10.0, 10.0], Condition::FirstUseEver)
        .resizable(true)
        .build(|| {
            let rt = &mut *runtime;
            if ui.button("Create Game Object") {
                rt.editor.create_game_object(&mut rt.scene);
            }
            let has_selection = rt.editor.selected().is_some();
            ui.same_line();
            ui.disabled(!has_selection, || {
                if ui.button("Create Child") {
                    rt.editor.create_child(&mut rt.scene);
                }
            });

            if has_selection {
                let label = if rt.editor.is_moving() { "Cancel Move" } else { "Move" };
                if ui.button(label) {
                    rt.editor.toggle_move();
                }
                if rt.editor.is_moving() {
                    ui.same_line();
                    if ui.button("To Top Level") {
                        rt.editor.move_selection_to_root(&mut rt.scene);
                    }
                    ui.text_disabled("Click the new parent");
                }
            }
            ui.separator();

            if rt.scene.is_empty() {
                ui.text("No Objects");
                return;
            }

            let mut clicked = None;
            for (id, depth) in rt.scene.walk() {
                let Some(node) = rt.scene.get(id) else {
                    continue;
                };
                let indent = depth as f32 * DEPTH_INDENT;
                if indent > 0.0 {
                    ui.indent_by(indent);
                }
                let is_selected = rt.editor.selected() == Some(id);
                if ui
                    .selectable_config(format!("{}##{:?}", node.name, id))
                    .selected(is_selected)
                    .build()
                {
                    clicked = Some(id);
                }
                if indent > 0.0 {
                    ui.unindent_by(indent);
                }
            }
            if let Some(id) = clicked {
                rt.editor.hierarchy_clicked(&mut rt.scene, id);
            }
        });
}

/// Name, transform, payload and behaviors of the selection
pub fn inspector_panel<B: RenderBackend>(ui: &Ui, runtime: &mut Runtime<B>, display_size: [f32; 2]) {
    let panel_width = (display_size[0] * 0.25).clamp(280.0, 420.0);

    ui.window("Inspector")
        .size([panel_width, display_size[1] * 0.85], Condition::FirstUseEver)
        .position([display_size[0] - panel_width - 10.0, 10.0], Condition::FirstUseEver)
        .resizable(true)
        .build(|| {
            let rt = &mut *runtime;
            let Some(id) = rt.editor.selected() else {
                ui.text("Nothing selected");
                return;
            };

            if ui
                .input_text("Name", &mut rt.editor.inspector.name)
                .enter_returns_true(true)
                .build()
            {
                rt.editor.commit_name(&mut rt.scene);
            }

            if ui.collapsing_header("Transform", TreeNodeFlags::DEFAULT_OPEN) {
                let mut commit = false;
                for (row, label) in TRANSFORM_ROWS.iter().enumerate() {
                    ui.text(label);
                    let fields = rt.editor.inspector.transform.row_mut(row);
                    for (axis, field) in ["x", "y", "z"].iter().zip(fields.iter_mut()) {
                        ui.set_next_item_width(ui.content_region_avail()[0] / 3.0 - 8.0);
                        commit |= ui
                            .input_text(format!("##{}{}", label, axis), field)
                            .enter_returns_true(true)
                            .build();
                        if *axis != "z" {
                            ui.same_line();
                        }
                    }
                }
                if ui.button("Apply Transform") || commit {
                    rt.editor.commit_transform(&mut rt.scene);
                }
            }

            if ui.collapsing_header("Render Component", TreeNodeFlags::DEFAULT_OPEN) {
                ui.input_text("Obj File", &mut rt.editor.inspector.render.object_path)
                    .build();
                ui.input_text("Image File", &mut rt.editor.inspector.render.image_path)
                    .build();
                if ui.button("Reload") {
                    rt.editor.commit_render(&mut rt.scene, &mut rt.backend);
                }
                let active = rt.scene.get(id).is_some_and(|node| node.has_payload());
                ui.same_line();
                ui.text_disabled(if active { "loaded" } else { "inactive" });
            }

            let mut remove: Option<BehaviorKind> = None;
            if let Some(node) = rt.scene.get_mut(id) {
                for (i, behavior) in node.behaviors_mut().enumerate() {
                    let _id = ui.push_id_usize(i);
                    let kind = behavior.kind();
                    if ui.collapsing_header(kind.name(), TreeNodeFlags::DEFAULT_OPEN) {
                        behavior.render_ui(ui);
                        if ui.button("Remove") {
                            remove = Some(kind);
                        }
                    }
                }
            }
            if let Some(kind) = remove {
                if let Err(e) = rt.scene.remove_behavior(id, kind, &mut rt.backend) {
                    log::warn!("Could not remove {}: {}", kind, e);
                }
            }

            ui.separator();
            ui.input_text("##add_component", &mut rt.editor.inspector.new_behavior)
                .hint("Behavior name")
                .build();
            ui.same_line();
            if ui.button("Add Component") {
                if let Err(e) = rt.editor.add_behavior(&mut rt.scene, &rt.registry) {
                    log::warn!("Could not add behavior: {}", e);
                }
            }
            ui.text_disabled(rt.registry.names().collect::<Vec<_>>().join(", "));

            ui.separator();
            if ui.button("Delete") {
                rt.editor.delete_selection(&mut rt.scene, &mut rt.backend);
            }
        });
}

/// Play controls and scene file buttons
pub fn scene_panel<B: RenderBackend>(ui: &Ui, runtime: &mut Runtime<B>) {
    ui.window("Scene")
        .size([260.0, 150.0], Condition::FirstUseEver)
        .position([10.0, 560.0], Condition::FirstUseEver)
        .build(|| {
            let rt = &mut *runtime;
            rt.behaviors.render_ui(ui);
            ui.separator();
            if ui.button("Save") {
                if let Err(e) = rt.save() {
                    log::warn!("Save failed: {}", e);
                }
            }
            ui.same_line();
            if ui.button("Load") {
                if let Err(e) = rt.load() {
                    log::warn!("Load failed: {}", e);
                }
            }
            ui.text_disabled(rt.config.scene_path.display().to_string());
            ui.text(format!("{} nodes", rt.scene.len()));
        });
}
