use crate::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    All,
    Active,
    Completed,
}

impl Visibility {
    pub fn from_fragment(fragment: &str) -> Option<Self> {
        let token = fragment.strip_prefix('#').unwrap_or(fragment);
        match token {
            "" | "/" => Some(Self::All),
            "/active" => Some(Self::Active),
            "/completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn apply_fragment(self, fragment: &str) -> Self {
        Self::from_fragment(fragment).unwrap_or(self)
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.done,
            Self::Completed => task.done,
        }
    }

    pub fn filtered<'a>(self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}
