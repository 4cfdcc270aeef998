/*!
Terminal rendering of gamepad key state.

Draws the decoded key state as rows of boxed cells (four 20-column cells per
row) with ANSI-colored pressed/released labels, clearing the screen between
frames. Pure formatting: all protocol work happens in the `gamepad` crate.
*/

use gamepad::{ButtonLabels, RetroidKeys, SkydroidKeys};

/// Width of one cell in the button grid
const CELL_WIDTH: usize = 20;

/// Width of the device banner box
const BANNER_WIDTH: usize = 86;

/// ANSI reset-and-clear sequence emitted before each frame
const CLEAR_SCREEN: &str = "\x1bc";

/// Render the Retroid key state as a boxed terminal frame
pub fn render_retroid(keys: &RetroidKeys, labels: &ButtonLabels) -> String {
    let mut out = String::new();
    out.push_str(CLEAR_SCREEN);
    out.push_str(&banner("Joystick Device: Retroid(Lite3)"));
    out.push_str(&cell_row(
        ["L2", "L1", "R1", "R2"],
        [
            labels.get(keys.l2).to_string(),
            labels.get(keys.l1).to_string(),
            labels.get(keys.r1).to_string(),
            labels.get(keys.r2).to_string(),
        ],
    ));
    out.push_str(&cell_row(
        ["X", "Y", "A", "B"],
        [
            labels.get(keys.x).to_string(),
            labels.get(keys.y).to_string(),
            labels.get(keys.a).to_string(),
            labels.get(keys.b).to_string(),
        ],
    ));
    out.push_str(&cell_row(
        ["up", "down", "left", "right"],
        [
            labels.get(keys.up).to_string(),
            labels.get(keys.down).to_string(),
            labels.get(keys.left).to_string(),
            labels.get(keys.right).to_string(),
        ],
    ));
    out.push_str(&cell_row(
        ["select", "start", "left_axis_button", "right_axis_button"],
        [
            labels.get(keys.select).to_string(),
            labels.get(keys.start).to_string(),
            labels.get(keys.left_axis_button).to_string(),
            labels.get(keys.right_axis_button).to_string(),
        ],
    ));
    out.push_str(&axes_row(
        keys.left_axis_x,
        keys.left_axis_y,
        keys.right_axis_x,
        keys.right_axis_y,
    ));
    out
}

/// Render the Skydroid key state as a boxed terminal frame
pub fn render_skydroid(keys: &SkydroidKeys, labels: &ButtonLabels) -> String {
    let mut out = String::new();
    out.push_str(CLEAR_SCREEN);
    out.push_str(&banner("Joystick Device: Skydroid(X30)"));
    out.push_str(&cell_row(
        ["A", "B", "C", "D"],
        [
            labels.get(keys.a).to_string(),
            labels.get(keys.b).to_string(),
            labels.get(keys.c).to_string(),
            labels.get(keys.d).to_string(),
        ],
    ));
    out.push_str(&cell_row(
        ["E", "F", "Reserved", "Right"],
        [
            labels.get(keys.e).to_string(),
            labels.get(keys.f).to_string(),
            labels.get(keys.reserved).to_string(),
            labels.get(keys.right).to_string(),
        ],
    ));
    out.push_str(&cell_row(
        ["SW1", "SW2", "SW3", "SW4"],
        [
            keys.sw1.to_string(),
            keys.sw2.to_string(),
            keys.sw3.to_string(),
            keys.sw4.to_string(),
        ],
    ));
    out.push_str(&axes_row(
        keys.left_axis_x,
        keys.left_axis_y,
        keys.right_axis_x,
        keys.right_axis_y,
    ));
    out
}

/// Full-width banner box naming the device
fn banner(title: &str) -> String {
    format!(
        "┌{0:─^width$}┐\n│{title:^width$}│\n└{0:─^width$}┘\n",
        "",
        title = title,
        width = BANNER_WIDTH,
    )
}

/// One row of four titled cells.
///
/// Values longer than the cell width (the pre-padded ANSI labels) are passed
/// through unchanged; shorter values are centered.
fn cell_row(titles: [&str; 4], values: [String; 4]) -> String {
    let mut top = String::new();
    let mut mid = String::new();
    let mut bottom = String::new();
    for (title, value) in titles.iter().zip(values.iter()) {
        top.push_str(&format!("┌{:─^width$}┐", title, width = CELL_WIDTH));
        mid.push_str(&format!("│{:^width$}│", value, width = CELL_WIDTH));
        bottom.push_str(&format!("└{:─^width$}┘", "", width = CELL_WIDTH));
    }
    format!("{}\n{}\n{}\n", top, mid, bottom)
}

/// Bottom row showing the four normalized axis values
fn axes_row(left_x: f32, left_y: f32, right_x: f32, right_y: f32) -> String {
    cell_row(
        ["left_axis_x", "left_axis_y", "right_axis_x", "right_axis_y"],
        [
            left_x.to_string(),
            left_y.to_string(),
            right_x.to_string(),
            right_y.to_string(),
        ],
    )
}
