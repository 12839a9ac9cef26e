//! Input conversion utilities.
//!
//! Maps egui's raw input (pointer events, dropped files) to the
//! platform-agnostic values handed to [`AppHandler`](crate::AppHandler).

use std::sync::Arc;

use crate::error::AppError;

/// Points egui reports per wheel line on pixel-precise devices.
const POINTS_PER_LINE: f32 = 50.0;
/// Lines scrolled by one page step.
const LINES_PER_PAGE: f32 = 20.0;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Any extra button.
    Unknown,
}

impl From<egui::PointerButton> for MouseButton {
    fn from(button: egui::PointerButton) -> Self {
        match button {
            egui::PointerButton::Primary => Self::Left,
            egui::PointerButton::Secondary => Self::Right,
            egui::PointerButton::Middle => Self::Middle,
            egui::PointerButton::Extra1 | egui::PointerButton::Extra2 => Self::Unknown,
        }
    }
}

/// A pointer event addressed to the application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Button press or release at a position in physical pixels.
    Button {
        x: f32,
        y: f32,
        button: MouseButton,
        pressed: bool,
    },
    /// Wheel movement in lines.
    Scroll { delta_x: f32, delta_y: f32 },
}

/// Extract button and wheel events from a frame's raw input.
pub(crate) fn pointer_inputs(events: &[egui::Event], pixels_per_point: f32) -> Vec<PointerInput> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => Some(PointerInput::Button {
                x: pos.x * pixels_per_point,
                y: pos.y * pixels_per_point,
                button: (*button).into(),
                pressed: *pressed,
            }),
            egui::Event::MouseWheel { unit, delta, .. } => {
                let scale = match unit {
                    egui::MouseWheelUnit::Point => 1.0 / POINTS_PER_LINE,
                    egui::MouseWheelUnit::Line => 1.0,
                    egui::MouseWheelUnit::Page => LINES_PER_PAGE,
                };
                Some(PointerInput::Scroll {
                    delta_x: delta.x * scale,
                    delta_y: delta.y * scale,
                })
            }
            _ => None,
        })
        .collect()
}

/// A file dropped onto the window, with its contents loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    /// File name without directories.
    pub name: String,
    /// Raw file contents.
    pub bytes: Arc<[u8]>,
}

impl DroppedFile {
    /// Load a file egui reported as dropped.
    ///
    /// Browsers deliver the contents with the event; native platforms only
    /// deliver a path, which is read here.
    pub(crate) fn load(file: &egui::DroppedFile) -> Result<Self, AppError> {
        let name = file_name(file);
        if let Some(bytes) = &file.bytes {
            return Ok(Self {
                name,
                bytes: Arc::clone(bytes),
            });
        }

        let Some(path) = &file.path else {
            return Err(AppError::DroppedFile {
                name,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "dropped file has neither a path nor contents",
                ),
            });
        };
        match std::fs::read(path) {
            Ok(bytes) => Ok(Self {
                name,
                bytes: bytes.into(),
            }),
            Err(source) => Err(AppError::DroppedFile { name, source }),
        }
    }
}

fn file_name(file: &egui::DroppedFile) -> String {
    if !file.name.is_empty() {
        return file.name.clone();
    }
    file.path
        .as_deref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::primary(egui::PointerButton::Primary, MouseButton::Left)]
    #[case::secondary(egui::PointerButton::Secondary, MouseButton::Right)]
    #[case::middle(egui::PointerButton::Middle, MouseButton::Middle)]
    #[case::extra(egui::PointerButton::Extra2, MouseButton::Unknown)]
    fn test_button_mapping(#[case] button: egui::PointerButton, #[case] expected: MouseButton) {
        assert_eq!(MouseButton::from(button), expected);
    }

    #[test]
    fn test_pointer_inputs_scale_to_pixels() {
        let events = vec![
            egui::Event::PointerMoved(egui::pos2(1.0, 1.0)),
            egui::Event::PointerButton {
                pos: egui::pos2(10.0, 20.0),
                button: egui::PointerButton::Primary,
                pressed: true,
                modifiers: egui::Modifiers::NONE,
            },
        ];

        let inputs = pointer_inputs(&events, 2.0);
        assert_eq!(
            inputs,
            vec![PointerInput::Button {
                x: 20.0,
                y: 40.0,
                button: MouseButton::Left,
                pressed: true,
            }]
        );
    }

    #[test]
    fn test_dropped_bytes_are_used_directly() {
        let file = egui::DroppedFile {
            name: "image.png".to_string(),
            bytes: Some(Arc::from(&[1u8, 2, 3][..])),
            ..Default::default()
        };

        let dropped = DroppedFile::load(&file).unwrap();
        assert_eq!(dropped.name, "image.png");
        assert_eq!(&*dropped.bytes, &[1, 2, 3]);
    }

    #[test]
    fn test_dropped_path_is_read() {
        let path = std::env::temp_dir().join("esframe_app_dropped_file_test.bin");
        std::fs::write(&path, b"texels").unwrap();

        let file = egui::DroppedFile {
            path: Some(path.clone()),
            ..Default::default()
        };
        let dropped = DroppedFile::load(&file).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(dropped.name, "esframe_app_dropped_file_test.bin");
        assert_eq!(&*dropped.bytes, b"texels");
    }

    #[test]
    fn test_unreadable_drop_names_the_file() {
        let file = egui::DroppedFile {
            path: Some(std::env::temp_dir().join("esframe_missing_dir/nothing.png")),
            ..Default::default()
        };

        let err = DroppedFile::load(&file).unwrap_err();
        assert_eq!(err.to_string(), "Failed to read drag & dropped file [nothing.png].");
    }
}
