use crate::{
    history::History,
    osu_input::{OsuInput, PointerHistory, PointerState},
};

/// Every input recorded during an attempt
#[derive(Default)]
pub struct ReplayLog {
    frames: History<OsuInput>,
}

impl ReplayLog {
    pub fn store_input(&mut self, input: OsuInput) {
        self.frames.add(input.ts, input);
    }

    pub fn last_input(&self) -> Option<&OsuInput> {
        self.frames.last()
    }

    pub fn input_at(&self, ts: f64) -> Option<&OsuInput> {
        self.frames.data_at_time(ts)
    }

    pub fn frames(&self) -> impl Iterator<Item = &OsuInput> {
        self.frames.iter().map(|(_, input)| input)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl PointerHistory for ReplayLog {
    fn data_at_time(&self, time: f64) -> Option<PointerState> {
        self.input_at(time).map(OsuInput::pointer_state)
    }
}
