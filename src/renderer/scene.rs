//! Scene assembly: turns a read-only game snapshot into a triangle list
//!
//! Draw order: lane markings, bike, cars, police, joystick.

use glam::Vec2;

use super::shapes::{circle, inset_rect, rect};
use super::vertex::{Vertex, colors};
use crate::consts::{BLINK_INTERVAL_MS, LANE_DASH_LENGTH, LANE_PERIOD};
use crate::platform::Joystick;
use crate::sim::{BikeVariant, GameState, Obstacle, Pursuer, PursuerStatus, Rect};

const LANE_LINE_WIDTH: f32 = 4.0;

/// Wall-clock toggle for the police light bars, independent of the tick rate
#[derive(Debug, Clone, Copy, Default)]
pub struct BlinkTimer {
    last_toggle_ms: Option<f64>,
    red_lit: bool,
}

impl BlinkTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current time (ms). Returns true if the lights flipped.
    pub fn update(&mut self, now_ms: f64) -> bool {
        let Some(last) = self.last_toggle_ms else {
            self.last_toggle_ms = Some(now_ms);
            return false;
        };
        if now_ms - last < BLINK_INTERVAL_MS {
            return false;
        }
        self.red_lit = !self.red_lit;
        self.last_toggle_ms = Some(now_ms);
        true
    }

    /// Which half of the light bar is lit
    pub fn red_lit(&self) -> bool {
        self.red_lit
    }
}

/// Build the full frame for the current state
pub fn build_scene(state: &GameState, joystick: &Joystick, blink: &BlinkTimer) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(1024);

    lane_markings(&mut vertices, state);
    bike(&mut vertices, state);
    for car in &state.obstacles {
        obstacle(&mut vertices, car);
    }
    for pursuer in state.pursuers.iter().filter(|p| p.is_active()) {
        let r = pursuer_draw_rect(state, pursuer);
        police_car(&mut vertices, r, blink);
    }
    joystick_overlay(&mut vertices, joystick);

    vertices
}

/// Dashed center line scrolling with `scroll_offset`
fn lane_markings(out: &mut Vec<Vertex>, state: &GameState) {
    let scale = state.viewport.scale();
    let x = state.viewport.width / 2.0 - LANE_LINE_WIDTH * scale / 2.0;
    let mut y = state.scroll_offset;
    while y < state.viewport.height {
        out.extend(rect(
            Rect::new(x, y, LANE_LINE_WIDTH * scale, LANE_DASH_LENGTH),
            colors::LANE_MARKING,
        ));
        y += LANE_PERIOD;
    }
}

fn bike(out: &mut Vec<Vertex>, state: &GameState) {
    let b = &state.bike;
    let draw_x = b.pos.x + b.draw_offset_x(&state.tuning.bike_aspects);
    let normal_width = b.height * state.tuning.bike_aspects.normal;
    let body = Rect::new(
        draw_x + (b.width - normal_width) / 2.0 + normal_width * 0.3,
        b.pos.y,
        normal_width * 0.4,
        b.height,
    );
    out.extend(rect(body, colors::BIKE));

    // Extended leg on kick frames
    let leg_reach = match b.variant() {
        BikeVariant::Normal => 0.0,
        BikeVariant::Kicking1 => 0.5,
        BikeVariant::Kicking2 => 1.0,
    };
    if leg_reach > 0.0 {
        let leg_len = (b.width - normal_width * 0.5) * leg_reach;
        out.extend(rect(
            Rect::new(body.x + body.w, b.pos.y + b.height * 0.45, leg_len, b.height * 0.08),
            colors::RIDER,
        ));
    }

    let head = Vec2::new(body.x + body.w / 2.0, b.pos.y + b.height * 0.4);
    out.extend(circle(head, normal_width * 0.22, colors::RIDER, 12));
}

fn obstacle(out: &mut Vec<Vertex>, car: &Obstacle) {
    let r = car.rect();
    let body = colors::CARS[car.variant as usize % colors::CARS.len()];
    out.extend(rect(r, body));
    out.extend(rect(
        Rect::new(r.x + r.w * 0.15, r.y + r.h * 0.2, r.w * 0.7, r.h * 0.18),
        colors::WINDSHIELD,
    ));
}

/// Attached police sit centered on their car, others at their own position
fn pursuer_draw_rect(state: &GameState, pursuer: &Pursuer) -> Rect {
    let car = match pursuer.status {
        PursuerStatus::Attached { obstacle_id } => state.obstacle(obstacle_id),
        _ => None,
    };
    match car {
        Some(car) => {
            let c = car.rect().center();
            Rect::new(
                c.x - pursuer.width / 2.0,
                c.y - pursuer.height / 2.0,
                pursuer.width,
                pursuer.height,
            )
        }
        None => pursuer.rect(),
    }
}

fn police_car(out: &mut Vec<Vertex>, r: Rect, blink: &BlinkTimer) {
    out.extend(rect(r, colors::POLICE_BODY));
    out.extend(inset_rect(
        Rect::new(r.x, r.y + r.h * 0.3, r.w, r.h * 0.4),
        r.w * 0.1,
        colors::POLICE_ROOF,
    ));

    let bar_y = r.y + r.h * 0.35;
    let half = r.w * 0.35;
    let (left, right) = if blink.red_lit() {
        (colors::LIGHT_RED, colors::LIGHT_OFF)
    } else {
        (colors::LIGHT_OFF, colors::LIGHT_BLUE)
    };
    let bar_h = r.h * 0.08;
    out.extend(rect(Rect::new(r.x + r.w * 0.15, bar_y, half, bar_h), left));
    out.extend(rect(Rect::new(r.x + r.w * 0.5, bar_y, half, bar_h), right));
}

fn joystick_overlay(out: &mut Vec<Vertex>, joystick: &Joystick) {
    out.extend(circle(joystick.center, joystick.radius, colors::JOYSTICK_BASE, 32));
    out.extend(circle(
        joystick.knob,
        joystick.knob_radius,
        colors::JOYSTICK_KNOB,
        24,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Viewport;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(1, Viewport::default(), Tuning::default())
    }

    fn count_color(vertices: &[Vertex], color: [f32; 4]) -> usize {
        vertices.iter().filter(|v| v.color == color).count()
    }

    #[test]
    fn test_blink_toggles_on_wall_clock() {
        let mut blink = BlinkTimer::new();
        assert!(!blink.update(1000.0));
        assert!(!blink.update(1499.0));
        assert!(!blink.red_lit());
        assert!(blink.update(1500.0));
        assert!(blink.red_lit());
        assert!(!blink.update(1600.0));
        assert!(blink.update(2000.0));
        assert!(!blink.red_lit());
    }

    #[test]
    fn test_lane_dashes_follow_scroll_offset() {
        let mut s = state();
        s.scroll_offset = 0.0;
        let js = Joystick::new(&s.viewport);
        let verts = build_scene(&s, &js, &BlinkTimer::new());
        // 800 / 50 dashes, six vertices each
        assert_eq!(count_color(&verts, colors::LANE_MARKING), 16 * 6);

        let mut lane = Vec::new();
        s.scroll_offset = 30.0;
        lane_markings(&mut lane, &s);
        assert_eq!(lane[0].position[1], 30.0);
    }

    #[test]
    fn test_inactive_police_not_drawn() {
        let s = state();
        let js = Joystick::new(&s.viewport);
        let verts = build_scene(&s, &js, &BlinkTimer::new());
        assert_eq!(count_color(&verts, colors::POLICE_BODY), 0);
    }

    #[test]
    fn test_attached_police_centered_on_car() {
        let mut s = state();
        let id = s.push_obstacle(Vec2::new(100.0, 200.0), 0);
        s.pursuers[0].status = PursuerStatus::Attached { obstacle_id: id };
        s.pursuers[0].pos = Vec2::new(100.0, 200.0);
        let r = pursuer_draw_rect(&s, &s.pursuers[0]);
        assert_eq!(r.center(), s.obstacles[0].rect().center());

        let js = Joystick::new(&s.viewport);
        let verts = build_scene(&s, &js, &BlinkTimer::new());
        assert_eq!(count_color(&verts, colors::POLICE_BODY), 6);
        assert_eq!(count_color(&verts, colors::LIGHT_BLUE), 6);
    }
}
