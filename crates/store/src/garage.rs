use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{
    domain::{Vehicle, VehicleLocation, VEHICLE_IMPOUNDED, VEHICLE_OUT, VEHICLE_STORED},
    protocol::{RpcAction, RpcResponse},
};

use crate::actions::PhoneActions;

pub const DEFAULT_VALET_COST: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GarageState {
    pub vehicles: Vec<Vehicle>,
    pub valet_enabled: bool,
    pub valet_cost: f64,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for GarageState {
    fn default() -> Self {
        Self {
            vehicles: Vec::new(),
            valet_enabled: true,
            valet_cost: DEFAULT_VALET_COST,
            loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GarageMutation {
    SetVehicles(Vec<Vehicle>),
    UpsertVehicle(Vehicle),
    SetStatus {
        plate: String,
        status: String,
    },
    SetLocation {
        plate: String,
        location: VehicleLocation,
    },
    RemoveVehicle(String),
    SetValetConfig {
        enabled: bool,
        cost: f64,
    },
    SetLoading(bool),
    SetError(Option<String>),
}

impl GarageState {
    pub fn apply(&mut self, mutation: GarageMutation) {
        match mutation {
            GarageMutation::SetVehicles(vehicles) => self.vehicles = vehicles,
            GarageMutation::UpsertVehicle(vehicle) => match self.vehicle_mut(&vehicle.plate) {
                Some(slot) => *slot = vehicle,
                None => self.vehicles.push(vehicle),
            },
            GarageMutation::SetStatus { plate, status } => {
                if let Some(vehicle) = self.vehicle_mut(&plate) {
                    vehicle.status = status;
                }
            }
            GarageMutation::SetLocation { plate, location } => {
                if let Some(vehicle) = self.vehicle_mut(&plate) {
                    vehicle.set_location(location);
                }
            }
            GarageMutation::RemoveVehicle(plate) => self.vehicles.retain(|v| v.plate != plate),
            GarageMutation::SetValetConfig { enabled, cost } => {
                self.valet_enabled = enabled;
                self.valet_cost = cost;
            }
            GarageMutation::SetLoading(loading) => self.loading = loading,
            GarageMutation::SetError(error) => self.error = error,
        }
    }

    fn vehicle_mut(&mut self, plate: &str) -> Option<&mut Vehicle> {
        self.vehicles.iter_mut().find(|v| v.plate == plate)
    }

    pub fn vehicle(&self, plate: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.plate == plate)
    }

    pub fn vehicles_with_status<'a>(
        &'a self,
        status: &'a str,
    ) -> impl Iterator<Item = &'a Vehicle> {
        self.vehicles.iter().filter(move |v| v.status == status)
    }

    pub fn stored_vehicles(&self) -> Vec<&Vehicle> {
        self.vehicles_with_status(VEHICLE_STORED).collect()
    }

    pub fn out_vehicles(&self) -> Vec<&Vehicle> {
        self.vehicles_with_status(VEHICLE_OUT).collect()
    }

    pub fn impounded_vehicles(&self) -> Vec<&Vehicle> {
        self.vehicles_with_status(VEHICLE_IMPOUNDED).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValetConfig {
    #[serde(default = "valet_enabled_default")]
    valet_enabled: bool,
    #[serde(default = "valet_cost_default")]
    valet_cost: f64,
}

fn valet_enabled_default() -> bool {
    true
}

fn valet_cost_default() -> f64 {
    DEFAULT_VALET_COST
}

impl PhoneActions {
    pub async fn fetch_vehicles(&self) -> RpcResponse {
        self.store().commit(GarageMutation::SetLoading(true));
        self.store().commit(GarageMutation::SetError(None));
        let response = self.call(RpcAction::GetVehicles, json!({})).await;
        if response.success {
            let vehicles: Vec<Vehicle> = response.field("vehicles").unwrap_or_default();
            self.store().commit(GarageMutation::SetVehicles(vehicles));
            if let Some(config) = response.field::<ValetConfig>("config") {
                self.store().commit(GarageMutation::SetValetConfig {
                    enabled: config.valet_enabled,
                    cost: config.valet_cost,
                });
            }
        } else {
            let error = response
                .message
                .clone()
                .or_else(|| response.error.clone())
                .unwrap_or_else(|| "Failed to fetch vehicles".to_string());
            self.store().commit(GarageMutation::SetError(Some(error)));
        }
        self.store().commit(GarageMutation::SetLoading(false));
        response
    }

    pub async fn request_valet(&self, plate: &str) -> RpcResponse {
        let response = self
            .call(RpcAction::RequestValet, json!({ "plate": plate }))
            .await;
        if response.success {
            self.store().commit(GarageMutation::SetStatus {
                plate: plate.to_string(),
                status: VEHICLE_OUT.to_string(),
            });
        }
        response
    }

    pub async fn locate_vehicle(&self, plate: &str) -> RpcResponse {
        let response = self
            .call(RpcAction::LocateVehicle, json!({ "plate": plate }))
            .await;
        if let Some(location) = response.success_field::<VehicleLocation>("location") {
            self.store().commit(GarageMutation::SetLocation {
                plate: plate.to_string(),
                location,
            });
        }
        response
    }
}
