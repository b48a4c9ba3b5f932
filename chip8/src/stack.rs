use crate::STACK_SIZE;

/// Fixed-capacity return address stack. `sp` counts the entries in use.
pub struct Stack {
    pub(crate) entries: [u16; STACK_SIZE],
    pub(crate) sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            entries: [0; STACK_SIZE],
            sp: 0,
        }
    }

    /// Push a return address, returning false if the stack is full
    pub fn push(&mut self, addr: u16) -> bool {
        if self.sp == STACK_SIZE {
            return false;
        }
        self.entries[self.sp] = addr;
        self.sp += 1;
        true
    }

    pub fn pop(&mut self) -> Option<u16> {
        if self.sp == 0 {
            return None;
        }
        self.sp -= 1;
        Some(self.entries[self.sp])
    }

    pub fn len(&self) -> usize {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Stack;
    use crate::STACK_SIZE;

    #[test]
    fn test_push_pop_order() {
        let mut stack = Stack::new();
        assert!(stack.push(0x202));
        assert!(stack.push(0x304));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop(), Some(0x304));
        assert_eq!(stack.pop(), Some(0x202));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_overflow() {
        let mut stack = Stack::new();
        for i in 0..STACK_SIZE {
            assert!(stack.push(i as u16));
        }
        assert!(!stack.push(0xFFF));
        assert_eq!(stack.len(), STACK_SIZE);
        assert_eq!(stack.pop(), Some(STACK_SIZE as u16 - 1));
    }

    #[test]
    fn test_underflow() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.len(), 0);
    }
}
