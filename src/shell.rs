use crate::{
    command::{Command, Flow},
    executable::{ExecutablePathFinder, ExecutableRunner, LaunchOptions},
    prompt::Prompter,
    session::Session,
    tokenizer::tokenize,
};

pub const PROMPT: &str = "$ ";

pub struct Shell<P: Prompter, F: ExecutablePathFinder, R: ExecutableRunner> {
    prompter: P,
    finder: F,
    runner: R,
    session: Session,
    launch_options: LaunchOptions,
}

impl<P: Prompter, F: ExecutablePathFinder, R: ExecutableRunner> Shell<P, F, R> {
    pub fn new(prompter: P, finder: F, runner: R, session: Session) -> Self {
        return Self {
            prompter,
            finder,
            runner,
            session,
            launch_options: LaunchOptions::default(),
        };
    }

    pub fn with_launch_options(mut self, launch_options: LaunchOptions) -> Self {
        self.launch_options = launch_options;
        return self;
    }

    /// Runs until `exit 0` or end of input and returns the exit status.
    ///
    /// Errors are fatal: the input could not be read or output could not be
    /// written.
    pub fn run(&mut self) -> anyhow::Result<i32> {
        loop {
            if let Flow::Exit(code) = self.step()? {
                return Ok(code);
            }
        }
    }

    /// One prompt/read/dispatch iteration.
    pub fn step(&mut self) -> anyhow::Result<Flow> {
        self.prompter.prompt(PROMPT)?;

        let Some(line) = self.prompter.read()? else {
            log::debug!("End of input");
            self.prompter.prompt("exit\n")?;
            return Ok(Flow::Exit(0));
        };

        return self.execute_line(&line);
    }

    pub fn execute_line(&mut self, line: &str) -> anyhow::Result<Flow> {
        let Some(command) = Command::from_tokens(tokenize(line.trim())) else {
            return Ok(Flow::Continue);
        };
        log::debug!("Dispatching {:?}", command);

        return command.run(
            &mut self.prompter,
            &self.finder,
            &self.runner,
            &mut self.session,
            self.launch_options,
        );
    }
}
