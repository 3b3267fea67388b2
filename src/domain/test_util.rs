use anyhow::anyhow;

/// Whether a faked driven port should behave as if its backing system is reachable
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    /// Fails the way a real adapter would if the store went away
    pub fn blow_up_if_disconnected(&self) -> Result<(), anyhow::Error> {
        match self {
            Self::Connected => Ok(()),
            Self::Disconnected => Err(anyhow!("could not connect to the todo store!")),
        }
    }
}

/// Stands in for one async trait method on a fake: records the arguments of every call and
/// hands back a canned result. Mocking crates struggle with `async fn` in traits, so fakes
/// lock themselves and delegate to one of these per method.
///
/// ```ignore
/// struct FakeTodoApi {
///     delete_todo_result: FakeImplementation<Uuid, anyhow::Result<DeletedTodo>>,
/// }
///
/// impl TodoApi for Mutex<FakeTodoApi> {
///     async fn delete_todo(&self, todo_id: Uuid) -> anyhow::Result<DeletedTodo> {
///         let mut locked = self.lock().unwrap();
///         locked.delete_todo_result.save_arguments(todo_id);
///         locked.delete_todo_result.return_value_anyhow()
///     }
/// }
/// ```
pub struct FakeImplementation<Args, Ret> {
    saved_arguments: Vec<Args>,
    return_value: Option<Ret>,
}

impl<Args, Ret> FakeImplementation<Args, Ret> {
    pub fn new() -> FakeImplementation<Args, Ret> {
        FakeImplementation {
            saved_arguments: Vec::new(),
            return_value: None,
        }
    }

    pub fn save_arguments(&mut self, arguments: Args) {
        self.saved_arguments.push(arguments)
    }

    /// Arguments from every call so far, oldest first
    pub fn calls(&self) -> &[Args] {
        self.saved_arguments.as_slice()
    }
}

impl<Args, Success, Fail> FakeImplementation<Args, Result<Success, Fail>>
where
    Success: Clone,
    Fail: Clone,
{
    pub fn set_returned_result(&mut self, return_value: Result<Success, Fail>) {
        self.return_value = Some(return_value);
    }

    pub fn return_value_result(&self) -> Result<Success, Fail> {
        match self.return_value {
            Some(ref result) => result.clone(),
            None => panic!("Tried to return from a fake where the result wasn't set!"),
        }
    }
}

impl<Args, Success> FakeImplementation<Args, anyhow::Result<Success>>
where
    Success: Clone,
{
    /// [anyhow::Error] isn't [Clone], so the error is stored as its message and rebuilt on every call
    pub fn set_returned_anyhow(&mut self, return_value: anyhow::Result<Success>) {
        self.return_value = Some(return_value.map_err(|err| anyhow!(format!("{err}"))));
    }

    pub fn return_value_anyhow(&self) -> anyhow::Result<Success> {
        match self.return_value {
            None => panic!("Tried to return from a fake where the result wasn't set!"),
            Some(Ok(ref ok_result)) => Ok(ok_result.clone()),
            Some(Err(ref err)) => Err(anyhow!(format!("{err}"))),
        }
    }
}
