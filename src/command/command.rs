use std::fmt::Debug;

use crate::misc::FloatingPoint;
use crate::scene::Scene;

/// A reversible edit of the scene
pub trait Command<T: FloatingPoint>: Debug {
    /// Perform the edit. Returns true if the command is done afterwards.
    fn doit(&mut self, scene: &mut Scene<T>) -> bool;

    /// Reverse the edit. Returns true if the command is undone afterwards.
    fn undoit(&mut self, scene: &mut Scene<T>) -> bool;

    fn is_done(&self) -> bool;
}

/// Commands performed and reversed as one
#[derive(Debug)]
pub struct MultiCommand<T: FloatingPoint> {
    commands: Vec<Box<dyn Command<T>>>,
    done: bool,
}

impl<T: FloatingPoint> Default for MultiCommand<T> {
    fn default() -> Self {
        Self {
            commands: vec![],
            done: true,
        }
    }
}

impl<T: FloatingPoint> MultiCommand<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command as it is
    pub fn add(&mut self, command: Box<dyn Command<T>>) {
        self.commands.push(command);
    }

    /// Perform a command and append it
    pub fn run(&mut self, scene: &mut Scene<T>, mut command: Box<dyn Command<T>>) -> bool {
        let done = command.doit(scene);
        self.commands.push(command);
        done
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.done = true;
    }
}

impl<T: FloatingPoint> Command<T> for MultiCommand<T> {
    fn doit(&mut self, scene: &mut Scene<T>) -> bool {
        self.done = self
            .commands
            .iter_mut()
            .fold(true, |acc, c| c.doit(scene) && acc);
        self.done
    }

    fn undoit(&mut self, scene: &mut Scene<T>) -> bool {
        let undone = self
            .commands
            .iter_mut()
            .rev()
            .fold(true, |acc, c| c.undoit(scene) && acc);
        self.done = !undone;
        undone
    }

    fn is_done(&self) -> bool {
        self.done
    }
}
