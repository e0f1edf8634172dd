use foodgram_shared::State;

mod register;

pub use register::RegisterInput;

#[derive(Clone)]
pub struct Command {
    pub(crate) state: State,
}

impl Command {
    pub fn new(state: State) -> Self {
        Self { state }
    }
}
