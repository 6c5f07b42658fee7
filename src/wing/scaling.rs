//! Proportional edits of the planform of a wing.  Each operation modifies the sections and
//! invalidates the surfaces and stations, the planform scalars are recomputed immediately.

use super::Wing;

const PRECISION: f64 = 1.0e-6;

impl Wing {
    /// Scales the chords and the offsets so that the root chord becomes `new_chord`.
    pub fn scale_chord(&mut self, new_chord: f64) {
        let root = self.root_chord();
        if root.abs() < PRECISION {
            return;
        }
        let ratio = new_chord / root;
        for s in self.sections.iter_mut() {
            s.chord *= ratio;
            s.offset *= ratio;
        }
        self.invalidate();
    }

    /// Scales the span positions so that the planform span becomes `new_span`.
    pub fn scale_span(&mut self, new_span: f64) {
        let span = self.planform_span();
        if span.abs() < PRECISION {
            return;
        }
        let ratio = new_span / span;
        for s in self.sections.iter_mut() {
            s.y *= ratio;
        }
        self.invalidate();
    }

    /// Moves the leading edges of the outer sections so that the quarter chord line has the
    /// sweep `new_sweep`, in degrees.  The root section is left in place.
    pub fn scale_sweep(&mut self, new_sweep: f64) {
        let Some(root) = self.sections.first() else {
            return;
        };
        let root_c4 = root.c4();
        let t = new_sweep.to_radians().tan();
        for s in self.sections.iter_mut().skip(1) {
            s.offset = root_c4 + t * s.y - s.chord / 4.0;
        }
        self.invalidate();
    }

    /// Scales the twist of the outer sections so that the tip twist becomes `new_twist`.  If the
    /// wing has no tip twist, the twist is made linear in the span position instead.
    pub fn scale_twist(&mut self, new_twist: f64) {
        let tip = self.tip_twist();
        let half_span = self.planform_span() / 2.0;
        for s in self.sections.iter_mut().skip(1) {
            if tip.abs() > 0.0001 {
                s.twist *= new_twist / tip;
            } else if half_span > PRECISION {
                s.twist = new_twist * s.y / half_span;
            }
        }
        self.invalidate();
    }

    /// Scales the span positions and the chords by the same factor so that the planform area
    /// becomes `new_area`.
    pub fn scale_area(&mut self, new_area: f64) {
        let area = self.planform_area();
        if area.abs() < PRECISION || new_area < PRECISION {
            return;
        }
        let ratio = (new_area / area).sqrt();
        for s in self.sections.iter_mut() {
            s.y *= ratio;
            s.chord *= ratio;
        }
        self.invalidate();
    }

    /// Changes the aspect ratio to `new_ar` while keeping the planform area.
    pub fn scale_aspect_ratio(&mut self, new_ar: f64) {
        let ar = self.aspect_ratio();
        if ar < 0.001 || new_ar < 0.001 {
            return;
        }
        let ratio = (new_ar / ar).sqrt();
        for s in self.sections.iter_mut() {
            s.y *= ratio;
            s.chord /= ratio;
            s.offset /= ratio;
        }
        self.invalidate();
    }

    /// Changes the taper ratio to `new_tr`.  The root chord is unchanged and the other chords are
    /// scaled in proportion to their span position.
    pub fn scale_taper_ratio(&mut self, new_tr: f64) {
        let tr = self.taper_ratio();
        let half_span = self.planform_span() / 2.0;
        if tr < 0.001 || new_tr < 0.001 || half_span < PRECISION {
            return;
        }
        let ratio = new_tr / tr;
        for s in self.sections.iter_mut() {
            let y_rel = s.y / half_span;
            s.chord *= 1.0 + y_rel * (ratio - 1.0);
        }
        self.invalidate();
    }
}
