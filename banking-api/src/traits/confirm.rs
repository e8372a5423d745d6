/// Guard step that asks the user before a consequential change.
pub trait Confirmer {
    /// Returns `true` only on an affirmative answer.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmer for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
