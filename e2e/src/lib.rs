//! Behavioural tests of the `stayone` client against a mock backend.

#[cfg(test)]
mod tests;
