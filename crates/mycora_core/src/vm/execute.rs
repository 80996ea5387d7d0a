use super::{Offspring, Organism, StepContext};
use crate::arena::Arena;
use crate::error::Fault;
use crate::isa::{Axis, Instruction, Operands};
use mycora_data::{symbol_at, symbol_code, Coord, Extent, Heading, Rect, ALPHABET};
use rand::Rng;

/// Where the instruction pointer goes after an instruction.
enum Flow {
    /// Move this many cells along the heading.
    Advance(i32),
    /// Stay on the current cell.
    Hold,
    Jump(Coord),
}

type Executed = (Flow, Option<Organism>);

impl Organism {
    /// Executes one instruction and ages the organism by one tick.
    ///
    /// Returns the newborn when the instruction was a successful divide.
    /// Faults are absorbed: recorded on the organism, never returned.
    pub fn step<R: Rng>(&mut self, ctx: &mut StepContext<'_, R>) -> Option<Organism> {
        let instruction = Instruction::decode(ctx.arena.read(self.ip));
        let operands = Operands::decode(instruction, self.following(ctx.arena));
        let width = 1 + operands.consumed as i32;

        let (flow, child) = match self.execute(instruction, &operands, width, ctx) {
            Ok(done) => done,
            Err(fault) => {
                self.record_fault(fault);
                (Flow::Advance(width), None)
            }
        };

        match flow {
            Flow::Advance(n) => self.ip = ctx.arena.wrap(self.ip + self.heading.delta() * n),
            Flow::Hold => {}
            Flow::Jump(target) => self.ip = ctx.arena.wrap(target),
        }
        self.age += 1;
        child
    }

    /// Symbols after the instruction pointer along the heading.
    fn following<'a>(&self, arena: &'a Arena) -> impl Iterator<Item = char> + 'a {
        let ip = self.ip;
        let delta = self.heading.delta();
        (1..).map(move |k| arena.read(ip + delta * k))
    }

    fn execute<R: Rng>(
        &mut self,
        instruction: Instruction,
        ops: &Operands,
        width: i32,
        ctx: &mut StepContext<'_, R>,
    ) -> Result<Executed, Fault> {
        let next = Flow::Advance(width);
        let skip = Flow::Advance(width + 1);
        let r1 = ops.reg(0);
        let r2 = ops.reg(1);

        let flow = match instruction {
            Instruction::Template(_) | Instruction::Modifier | Instruction::NoOp => next,
            Instruction::Turn(heading) => {
                self.heading = heading;
                next
            }
            Instruction::Jump => Flow::Jump(self.registers.get(r1)),
            Instruction::IfNotZero => {
                if self.registers.get(r1).is_zero() {
                    skip
                } else {
                    next
                }
            }
            Instruction::IfEqual => {
                if self.registers.get(r1) == self.registers.get(r2) {
                    next
                } else {
                    skip
                }
            }
            Instruction::Zero => {
                self.update_axis(ops, |_| 0);
                next
            }
            Instruction::One => {
                self.update_axis(ops, |_| 1);
                next
            }
            Instruction::Inc => {
                self.update_axis(ops, |v| v.wrapping_add(1));
                next
            }
            Instruction::Dec => {
                self.update_axis(ops, |v| v.wrapping_sub(1));
                next
            }
            Instruction::Sub => {
                let value = self.registers.get(r2) - self.registers.get(ops.reg(2));
                self.registers.set(r1, value);
                next
            }
            Instruction::Push => {
                self.stack.push(self.registers.get(r1))?;
                next
            }
            Instruction::Pop => {
                let value = self.stack.pop()?;
                self.registers.set(r1, value);
                next
            }
            Instruction::Origin => {
                self.registers.set(r1, self.genome.origin);
                next
            }
            Instruction::FindTemplate => self.find_template(ops, width, ctx),
            Instruction::Sense => {
                let cell = ctx.arena.cell(self.registers.get(r1));
                let kind = match cell.owner {
                    None => 0,
                    Some(owner) if owner == self.id => 1,
                    Some(_) => 2,
                };
                let code = symbol_code(cell.symbol).map_or(-1, |c| c as i32);
                self.registers.set(r2, Coord::new(kind, code));
                next
            }
            Instruction::Copy => {
                self.copy(ops, ctx)?;
                next
            }
            Instruction::CopyStep => self.copy_step(width, ctx)?,
            Instruction::Allocate => {
                self.allocate(ops, ctx)?;
                next
            }
            Instruction::Divide => return self.divide(ctx),
        };
        Ok((flow, None))
    }

    fn update_axis(&mut self, ops: &Operands, f: impl Fn(i32) -> i32) {
        let reg = ops.reg(0);
        let mut value = self.registers.get(reg);
        match ops.axis {
            Axis::X => value.x = f(value.x),
            Axis::Y => value.y = f(value.y),
            Axis::Both => {
                value.x = f(value.x);
                value.y = f(value.y);
            }
        }
        self.registers.set(reg, value);
    }

    /// `&`: reads the template following the operands and scans ahead for
    /// its complement. The ip skips the template either way.
    fn find_template<R: Rng>(
        &mut self,
        ops: &Operands,
        width: i32,
        ctx: &mut StepContext<'_, R>,
    ) -> Flow {
        let template: Vec<bool> = self
            .following(ctx.arena)
            .skip(ops.consumed)
            .take(ctx.config.template_max_len)
            .map_while(|s| match s {
                '.' => Some(false),
                ':' => Some(true),
                _ => None,
            })
            .collect();
        let len = template.len() as i32;
        let flow = Flow::Advance(width + len);
        if template.is_empty() {
            self.record_fault(Fault::TemplateNotFound);
            return flow;
        }

        let delta = self.heading.delta();
        let start = self.ip + delta * (width + len);
        let found = (0..i32::try_from(ctx.config.template_search_limit).unwrap_or(i32::MAX)).find(|&k| {
            let at = start + delta * k;
            template.iter().enumerate().all(|(i, bit)| {
                let want = if *bit { '.' } else { ':' };
                ctx.arena.read(at + delta * i as i32) == want
            })
        });

        match found {
            Some(k) => {
                let addr = ctx.arena.wrap(start + delta * (k + len));
                self.registers.set(ops.reg(0), addr);
            }
            None => self.record_fault(Fault::TemplateNotFound),
        }
        flow
    }

    /// `W`: copies one cell from r1 to r2.
    fn copy<R: Rng>(&mut self, ops: &Operands, ctx: &mut StepContext<'_, R>) -> Result<(), Fault> {
        let src = self.registers.get(ops.reg(0));
        let dst = self.registers.get(ops.reg(1));
        let symbol = transcribe(ctx.arena.read(src), ctx.config.copy_mutation_rate, ctx.rng);
        ctx.arena.write(dst, symbol, self.id)?;

        let (w, h) = (ctx.arena.width(), ctx.arena.height());
        if let Some(off) = self.offspring.as_mut() {
            if let Some(i) = off.rect.index_of(dst, w, h) {
                off.mark_written(i);
            }
        }
        Ok(())
    }

    /// `C`: copies the genome cell at the cursor into the offspring buffer.
    /// Holds the ip until the whole buffer has been covered.
    fn copy_step<R: Rng>(&mut self, width: i32, ctx: &mut StepContext<'_, R>) -> Result<Flow, Fault> {
        let genome = self.genome;
        let id = self.id;
        let off = self.offspring.as_mut().ok_or(Fault::NoOffspringBuffer)?;
        let area = off.rect.area();
        if off.cursor >= area {
            return Ok(Flow::Advance(width));
        }

        let k = off.cursor;
        let src = genome.offset(k % genome.area().max(1));
        let dst = off.rect.offset(k);
        let symbol = transcribe(ctx.arena.read(src), ctx.config.copy_mutation_rate, ctx.rng);
        ctx.arena.write(dst, symbol, id)?;
        off.mark_written(k);
        off.cursor += 1;

        if off.cursor < area {
            Ok(Flow::Hold)
        } else {
            Ok(Flow::Advance(width))
        }
    }

    /// `@`: claims an offspring buffer next to the genome, along the heading.
    fn allocate<R: Rng>(&mut self, ops: &Operands, ctx: &mut StepContext<'_, R>) -> Result<(), Fault> {
        if self.offspring.is_some() {
            return Err(Fault::OffspringPending);
        }
        let size_reg = ops.reg(0);
        let extent = Extent::from_coord(self.registers.get(size_reg)).unwrap_or(self.genome.extent);
        if extent.area() <= ctx.config.max_offspring_area {
            for attempt in 0..ctx.config.allocation_attempts {
                let origin = self.adjacent_origin(extent, attempt as i32);
                let rect = Rect::new(ctx.arena.wrap(origin), extent);
                if ctx.arena.claim(rect, self.id).is_ok() {
                    tracing::trace!(organism = %self.id, %rect, "offspring buffer claimed");
                    self.offspring = Some(Offspring::new(rect));
                    self.registers.set(ops.reg(1), rect.origin);
                    return Ok(());
                }
            }
        }
        self.registers.set(size_reg, Coord::ZERO);
        Err(Fault::RegionUnavailable)
    }

    /// Origin of the `attempt`-th candidate buffer beyond the genome.
    fn adjacent_origin(&self, extent: Extent, attempt: i32) -> Coord {
        let g = self.genome;
        let (gw, gh) = (i32::from(g.extent.width), i32::from(g.extent.height));
        let (cw, ch) = (i32::from(extent.width), i32::from(extent.height));
        let shift = match self.heading {
            Heading::Right => Coord::new(gw + attempt * cw, 0),
            Heading::Left => Coord::new(-cw * (attempt + 1), 0),
            Heading::Down => Coord::new(0, gh + attempt * ch),
            Heading::Up => Coord::new(0, -ch * (attempt + 1)),
        };
        g.origin + shift
    }

    /// `$`: turns the finished buffer into a new organism and resets the
    /// parent to the start of its genome.
    fn divide<R: Rng>(&mut self, ctx: &mut StepContext<'_, R>) -> Result<Executed, Fault> {
        let off = self.offspring.as_ref().ok_or(Fault::NoOffspringBuffer)?;
        if !off.is_complete() {
            return Err(Fault::IncompleteOffspring);
        }
        let rect = off.rect;
        let child_id = ctx.ids.next_id();
        ctx.arena.reassign(rect, self.id, child_id)?;

        let child = Organism::offspring_of(self, child_id, rect, ctx.tick);
        tracing::debug!(parent = %self.id, child = %child_id, %rect, "divide");
        self.offspring = None;
        self.children += 1;
        self.registers.clear();
        self.stack.clear();
        Ok((Flow::Jump(self.genome.origin), Some(child)))
    }
}

/// Symbol actually written by a copy, after copy-error noise.
fn transcribe<R: Rng>(symbol: char, rate: f64, rng: &mut R) -> char {
    if rate > 0.0 && rng.gen_bool(rate) {
        symbol_at(rng.gen_range(0..ALPHABET.len()))
    } else {
        symbol
    }
}
