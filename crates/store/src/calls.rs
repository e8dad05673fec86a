use serde::Serialize;
use shared::domain::{CallDirection, CallRecord, CallState};

pub const MAX_CALL_HISTORY: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CallsState {
    pub state: CallState,
    pub current_call: Option<CallRecord>,
    pub incoming_call: Option<CallRecord>,
    pub history: Vec<CallRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallsMutation {
    SetState(CallState),
    SetCurrentCall(Option<CallRecord>),
    SetIncomingCall(Option<CallRecord>),
    SetHistory(Vec<CallRecord>),
    AddToHistory(CallRecord),
    ClearCurrentCall,
    ReceiveIncoming {
        number: String,
        caller_name: Option<String>,
        at: i64,
    },
    StartOutgoing { number: String, at: i64 },
    Connect { at: i64 },
    Finish { at: i64 },
}

impl CallsState {
    pub fn apply(&mut self, mutation: CallsMutation) {
        match mutation {
            CallsMutation::SetState(state) => self.state = state,
            CallsMutation::SetCurrentCall(call) => self.current_call = call,
            CallsMutation::SetIncomingCall(call) => self.incoming_call = call,
            CallsMutation::SetHistory(history) => self.history = history,
            CallsMutation::AddToHistory(call) => self.push_history(call),
            CallsMutation::ClearCurrentCall => {
                self.current_call = None;
                self.incoming_call = None;
            }
            CallsMutation::ReceiveIncoming {
                number,
                caller_name,
                at,
            } => {
                let call = CallRecord {
                    number,
                    caller_name,
                    direction: CallDirection::Incoming,
                    start_time: at,
                    ..CallRecord::default()
                };
                self.state = CallState::Ringing;
                self.incoming_call = Some(call.clone());
                self.current_call = Some(call);
            }
            CallsMutation::StartOutgoing { number, at } => {
                self.state = CallState::Ringing;
                self.current_call = Some(CallRecord {
                    number,
                    direction: CallDirection::Outgoing,
                    start_time: at,
                    ..CallRecord::default()
                });
            }
            CallsMutation::Connect { at } => {
                self.state = CallState::Active;
                if self.current_call.is_none() {
                    self.current_call = self.incoming_call.clone();
                }
                if let Some(call) = self.current_call.as_mut() {
                    call.accepted_time.get_or_insert(at);
                }
            }
            CallsMutation::Finish { at } => {
                if self.state == CallState::Active {
                    if let Some(mut call) = self.current_call.take() {
                        let connected_at = call.accepted_time.unwrap_or(call.start_time);
                        let seconds = (at - connected_at) / 1000;
                        call.duration = Some(u64::try_from(seconds).unwrap_or(0));
                        call.end_time = Some(at);
                        self.push_history(call);
                    }
                }
                self.state = CallState::Idle;
                self.current_call = None;
                self.incoming_call = None;
            }
        }
    }

    fn push_history(&mut self, call: CallRecord) {
        self.history.insert(0, call);
        self.history.truncate(MAX_CALL_HISTORY);
    }

    pub fn is_in_call(&self) -> bool {
        self.state != CallState::Idle
    }

    pub fn is_ringing(&self) -> bool {
        self.state == CallState::Ringing
    }

    pub fn is_active(&self) -> bool {
        self.state == CallState::Active
    }
}
